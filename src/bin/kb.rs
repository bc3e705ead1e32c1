extern crate kalenderblatt as lib;

use flexi_logger::{FileSpec, Logger};
use lib::config::Config;
use lib::error::{Error, ErrorKind};
use lib::isoweek::IsoWeek;
use lib::layout::{CalendarRequest, Size};
use lib::render::Asymptote;
use std::path::PathBuf;
use std::process;
use structopt::clap::{AppSettings, ErrorKind as ClapErrorKind};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "kb",
    about = "Kalenderblatt - printable week calendar pages.",
    global_setting = AppSettings::ColorNever
)]
pub struct Args {
    #[structopt(help = "ISO year of the first week (default: current)")]
    pub start_year: Option<i32>,

    #[structopt(help = "ISO week number of the first week (default: current)")]
    pub start_week: Option<u32>,

    #[structopt(long = "weeks-per-page", default_value = "10")]
    pub weeks_per_page: u32,

    #[structopt(long = "pages", default_value = "1")]
    pub pages: u32,

    #[structopt(
        long = "cell-size",
        default_value = "39:18",
        help = "cell size as WIDTH:HEIGHT in millimetres"
    )]
    pub cell_size: Size,

    #[structopt(
        long = "paper-size",
        default_value = "297:210",
        help = "paper size as WIDTH:HEIGHT in millimetres"
    )]
    pub paper_size: Size,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "locale", help = "locale of the month names, e.g. de-CH")]
    pub locale: Option<String>,

    #[structopt(
        short = "o",
        long = "output-dir",
        default_value = ".",
        help = "directory the PDF files are written to",
        parse(from_os_str)
    )]
    pub output_dir: PathBuf,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

impl Args {
    fn request(&self) -> Result<CalendarRequest, Error> {
        let start = match (self.start_year, self.start_week) {
            (Some(year), Some(week)) => IsoWeek::new(year, week)?,
            (None, None) => IsoWeek::current(),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    "Either none or both a start year and week need to be specified.",
                ))
            }
        };

        CalendarRequest::new(
            start,
            self.weeks_per_page,
            self.pages,
            self.cell_size,
            self.paper_size,
        )
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.request()?;

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("Kalenderblatt ran into a fatal error!");
        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config: Config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    if let Some(locale) = args.locale {
        config.locale = locale;
    }
    let names = config.month_names()?;

    lib::interrupt::install_handler()?;

    let renderer = Asymptote::from_config(&config.renderer);
    lib::pages::generate(
        &request,
        &names,
        &config.style,
        &renderer,
        &args.output_dir,
        lib::interrupt::sigint(),
    )?;

    Ok(())
}

fn main() {
    let prog = std::env::args().next().unwrap_or_else(|| "kb".to_owned());

    let args = match Args::from_iter_safe(std::env::args_os()) {
        Ok(args) => args,
        Err(err)
            if matches!(
                err.kind,
                ClapErrorKind::HelpDisplayed | ClapErrorKind::VersionDisplayed
            ) =>
        {
            err.exit()
        }
        Err(err) => {
            let message = err.message.lines().next().unwrap_or_default().to_owned();
            eprintln!(
                "{}: {}",
                prog,
                message.trim_start_matches("error: ")
            );
            process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        let interrupted = err
            .downcast_ref::<Error>()
            .map_or(false, Error::is_interrupt);

        if interrupted {
            eprintln!("{}: Operation interrupted.", prog);
        } else {
            eprintln!("{}: error: {}", prog, err);
        }
        process::exit(1);
    }
}
