use clap::Parser;
use readsieve::filters::FilterChain;
use readsieve::io::{DataSink, DataSource};
use readsieve::metrics::KernelKind;
use readsieve::pipeline::{filter_stream, FilterStats};
use readsieve::{select_kernel, FastqStream, FastqWriter};

#[derive(Parser)]
#[command(name = "readsieve")]
#[command(about = "Filter FASTQ reads by length and quality", long_about = None)]
#[command(version)]
struct Cli {
    /// Filter chain: 'name:parameter' entries joined by '|',
    /// e.g. 'min_length:50|mean_quality:28'
    #[arg(value_name = "FILTERS")]
    filters: String,

    /// Input FASTQ file, plain or gzip ('-' for stdin)
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Output file ('-' for stdout); a .gz extension enables gzip
    #[arg(short = 'o', long, value_name = "FILE", default_value = "-")]
    output: String,

    /// Gzip compression level for compressed output
    #[arg(short = 'l', long, value_name = "INT", default_value = "2",
          value_parser = clap::value_parser!(u32).range(0..=9))]
    compression_level: u32,

    /// Worker threads for filter evaluation (1 = sequential)
    #[arg(short = 't', long, value_name = "INT", default_value = "1")]
    threads: usize,

    /// Metric kernel: 'optimized' or 'reference'
    #[arg(long, value_name = "KERNEL", default_value = "optimized")]
    kernel: String,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: i32,
}

fn run(cli: &Cli, parallel: bool) -> readsieve::Result<FilterStats> {
    // Compile before touching any file so a bad expression fails fast.
    let chain = FilterChain::compile(&cli.filters)?;

    let stream = FastqStream::new(DataSource::from_arg(&cli.input))?;
    let sink = DataSink::from_arg(&cli.output);
    let writer = FastqWriter::with_level(sink, cli.compression_level)?;

    filter_stream(&chain, stream, writer, parallel)
}

fn main() {
    let cli = Cli::parse();

    // Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
    // to Rust log levels
    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let kernel = match cli.kernel.as_str() {
        "optimized" => KernelKind::Optimized,
        "reference" => KernelKind::Reference,
        other => {
            log::error!(
                "Unknown kernel '{}' (known kernels: optimized, reference)",
                other
            );
            std::process::exit(1);
        }
    };
    select_kernel(kernel);
    log::debug!("Metric kernel: {}", cli.kernel);

    let mut num_threads = cli.threads;
    if num_threads < 1 {
        log::warn!("Invalid thread count {}, using 1 thread", num_threads);
        num_threads = 1;
    }

    let parallel = num_threads > 1;
    if parallel {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            Ok(_) => {
                log::debug!("Built global thread pool with {} threads", num_threads);
            }
            Err(e) => {
                log::warn!(
                    "Failed to configure thread pool: {} (may already be initialized)",
                    e
                );
            }
        }
    }

    match run(&cli, parallel) {
        Ok(stats) => {
            log::info!(
                "Kept {} of {} reads ({} discarded)",
                stats.kept_records,
                stats.input_records,
                stats.discarded_records
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
