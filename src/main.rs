use clap::{Parser, Subcommand};
use photo_variants::widths::WidthPolicy;
use photo_variants::{config, generate, output, picture, records};
use std::path::{Path, PathBuf};

/// Shared flags for commands that encode images.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the encoding cache and re-encode every variant
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "photo-variants")]
#[command(about = "Responsive image variants for photography portfolios")]
#[command(long_about = "\
Responsive image variants for photography portfolios

Every photo in the input directory becomes a family of resized WebP and AVIF
files plus a tiny inline placeholder, recorded in one manifest:

  _raw/Old Pier.jpg   →  _processed/old-pier/old-pier-640.webp
                         _processed/old-pier/old-pier-640.avif
                         …
                         _processed/old-pier/old-pier-2400.avif
                         _processed/manifest.json

Variants are never wider than the source. A page then asks `select` which
width to request; generator and selector share the [widths] config section,
so the answer always names a file that exists.

Run 'photo-variants gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when missing)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate variants and manifest.json from the input directory
    Generate {
        /// Source photos [default: paths.input]
        #[arg(long)]
        input: Option<PathBuf>,
        /// Variant and manifest directory [default: paths.output]
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        cache: CacheArgs,
    },
    /// Show which variant width to request for a native width
    Select {
        /// Native width of the source photo in pixels
        width: u32,
        /// Override widths.policy
        #[arg(long, value_enum)]
        policy: Option<WidthPolicy>,
    },
    /// Write one content record per photo (existing records are kept)
    Records {
        /// Manifest to read [default: {paths.output}/manifest.json]
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Record directory [default: paths.records]
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Override records.base_url
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Print <picture> markup for one photo
    Picture {
        /// Slug of the photo
        slug: String,
        /// Manifest to read [default: {paths.output}/manifest.json]
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Override records.base_url
        #[arg(long)]
        base_url: Option<String>,
        /// Value of the sizes attribute
        #[arg(long, default_value = picture::DEFAULT_SIZES)]
        sizes: String,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            input,
            output: output_arg,
            cache,
        } => {
            let config = config::load_config(&cli.config)?;
            let input = input.unwrap_or_else(|| PathBuf::from(&config.paths.input));
            let output_dir = output_arg.unwrap_or_else(|| PathBuf::from(&config.paths.output));
            let gen_config = generate::GenerateConfig::from_config(&config);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_generate_event(&event);
                }
            });
            let result = generate::generate(
                &input,
                &output_dir,
                &gen_config,
                !cache.no_cache,
                Some(tx),
            );
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let result = result?;

            let manifest_path = generate::write_manifest(&output_dir, &result.manifest)?;
            output::print_generate_summary(&result.manifest, &manifest_path, &result.cache_stats);
        }
        Command::Select { width, policy } => {
            let config = config::load_config(&cli.config)?;
            let policy = policy.unwrap_or(config.widths.policy);
            output::print_selection(width, &config.widths.standard, policy);
        }
        Command::Records {
            manifest,
            dir,
            base_url,
        } => {
            let config = config::load_config(&cli.config)?;
            let manifest_path = manifest.unwrap_or_else(|| default_manifest(&config));
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.paths.records));
            let base_url = base_url.unwrap_or(config.records.base_url);

            let manifest = records::read_manifest(&manifest_path)?;
            let outcomes = records::write_records(&manifest, &dir, &base_url)?;
            output::print_records_output(&outcomes);
        }
        Command::Picture {
            slug,
            manifest,
            base_url,
            sizes,
        } => {
            let config = config::load_config(&cli.config)?;
            let manifest_path = manifest.unwrap_or_else(|| default_manifest(&config));
            let base_url = base_url.unwrap_or_else(|| config.records.base_url.clone());

            let manifest = records::read_manifest(&manifest_path)?;
            let record = records::find_record(&manifest, &slug, &base_url)?;
            let entry = manifest
                .find(&slug)
                .ok_or_else(|| records::RecordsError::UnknownSlug(slug.clone()))?;
            let markup = picture::render_picture(
                &record,
                entry,
                &config.widths.standard,
                config.widths.policy,
                &sizes,
            );
            println!("{}", markup.into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn default_manifest(config: &config::PipelineConfig) -> PathBuf {
    Path::new(&config.paths.output).join(generate::MANIFEST_FILENAME)
}
