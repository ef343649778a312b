//! Screenshot Puller - Main entry point
//!
//! Pulls screenshot test results from a device and prints the report URL,
//! or rasterizes the report with `--generate-png`.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use screenshot_puller::device::{AdbTransport, DeviceTarget};
use screenshot_puller::package::{Aapt, PackageInspector};
use screenshot_puller::raster::Wkhtmltoimage;
use screenshot_puller::{pull_screenshots, utils, Config, PullOptions, PullOutcome};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("target").args(["emulator", "device", "serial"])))]
struct Args {
    /// Test package name (e.g. com.example.app.tests), or an APK path with --apk
    package: String,

    /// Treat the positional argument as an APK and read its package name
    #[arg(long)]
    apk: bool,

    /// Use the only running emulator
    #[arg(short = 'e')]
    emulator: bool,

    /// Use the only USB-connected device
    #[arg(short = 'd')]
    device: bool,

    /// Use the device with this serial number
    #[arg(short = 's', value_name = "SERIAL")]
    serial: Option<String>,

    /// Render the report to this image instead of printing its URL
    #[arg(long, value_name = "PNG")]
    generate_png: Option<PathBuf>,

    /// Only include screenshots whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    filter_name_regex: Option<String>,

    /// Working directory for pulled files (default: a new temporary directory)
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Android SDK root, used with --apk
    #[arg(long, value_name = "DIR", env = "ANDROID_SDK")]
    android_sdk: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    fn device_target(&self) -> DeviceTarget {
        if self.emulator {
            DeviceTarget::Emulator
        } else if self.device {
            DeviceTarget::Usb
        } else if let Some(serial) = &self.serial {
            DeviceTarget::Serial(serial.clone())
        } else {
            DeviceTarget::Default
        }
    }

    /// SDK root for --apk: flag or ANDROID_SDK, then ANDROID_HOME, then config.
    fn android_sdk_location(&self, android_home: Option<OsString>, config: &Config) -> Option<PathBuf> {
        self.android_sdk
            .clone()
            .or_else(|| android_home.filter(|h| !h.is_empty()).map(PathBuf::from))
            .or_else(|| config.sdk.android_sdk.clone())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::debug!("Starting pull-screenshots v{}", env!("CARGO_PKG_VERSION"));

    let package = if args.apk {
        let sdk = args
            .android_sdk_location(std::env::var_os("ANDROID_HOME"), &config)
            .context("--apk needs the Android SDK location (--android-sdk, ANDROID_SDK, ANDROID_HOME or [sdk] android_sdk)")?;
        let name = Aapt::from_sdk(&sdk)?.package_name(&PathBuf::from(&args.package))?;
        tracing::info!(apk = %args.package, package = %name, "Resolved package from APK");
        name
    } else {
        args.package.clone()
    };

    let transport = AdbTransport::new(config.adb.binary.clone(), args.device_target());
    let rasterizer = Wkhtmltoimage::new(config.render.rasterizer.clone());

    let options = PullOptions {
        package,
        filter_name_regex: args.filter_name_regex.clone(),
        output_image: args.generate_png.clone(),
        working_dir: args.temp_dir.clone(),
    };

    match pull_screenshots(&transport, &rasterizer, &options)? {
        PullOutcome::Report { html } => {
            println!("Open the following url in a browser to view the results: ");
            println!("  file://{}", html.display());
        }
        PullOutcome::Image { path } => {
            tracing::info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
