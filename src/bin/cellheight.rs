use std::{
    cell::RefCell,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cellheight", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size a JSON array of feed items and print one report per item.
    Measure(MeasureArgs),
    /// Print the default sizing configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct MeasureArgs {
    /// Input items JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Full layout width in pixels.
    #[arg(long)]
    width: f64,

    /// Column count of the multi-column layout.
    #[arg(long, default_value_t = 1)]
    columns: u32,

    /// Size for a signed-in viewer (shows notification controls).
    #[arg(long, default_value_t = false)]
    authenticated: bool,

    /// Sizing configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file used to lay out text; an estimating measurer is used when omitted.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Only size items of this family.
    #[arg(long, value_enum)]
    family: Option<FamilyChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FamilyChoice {
    Text,
    Notification,
    Image,
    Header,
    ArtistInvite,
    Announcement,
}

impl FamilyChoice {
    fn includes(self, tag: cellheight::TypeTag) -> bool {
        use cellheight::TypeTag as T;
        matches!(
            (self, tag),
            (Self::Text, T::Text | T::Comment)
                | (Self::Notification, T::Notification)
                | (Self::Image, T::Image | T::Embed)
                | (Self::Header, T::CategoryHeader | T::PromotionalHeader)
                | (Self::ArtistInvite, T::ArtistInvite)
                | (Self::Announcement, T::Announcement)
        )
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Measure(args) => cmd_measure(args),
        Command::Config => cmd_config(),
    }
}

fn read_items_json(path: &Path) -> anyhow::Result<Vec<cellheight::SizeableItem>> {
    let f = File::open(path).with_context(|| format!("open items '{}'", path.display()))?;
    let r = BufReader::new(f);
    let items: Vec<cellheight::SizeableItem> =
        serde_json::from_reader(r).with_context(|| "parse items JSON")?;
    Ok(items)
}

type Measurers = Box<dyn FnMut() -> Box<dyn cellheight::TextMeasurer>>;

fn make_measurers(font: Option<&Path>) -> anyhow::Result<Measurers> {
    let Some(path) = font else {
        return Ok(Box::new(|| {
            Box::new(cellheight::EstimatedTextMeasurer::default()) as Box<dyn cellheight::TextMeasurer>
        }));
    };
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    let measurer = cellheight::ParleyTextMeasurer::from_font_bytes(&bytes)
        .with_context(|| format!("load font '{}'", path.display()))?;
    eprintln!("font family: {}", measurer.family_name());

    let mut first = Some(measurer);
    Ok(Box::new(move || match first.take() {
        Some(m) => Box::new(m) as Box<dyn cellheight::TextMeasurer>,
        None => match cellheight::ParleyTextMeasurer::from_font_bytes(&bytes) {
            Ok(m) => Box::new(m),
            Err(_) => Box::new(cellheight::EstimatedTextMeasurer::default()),
        },
    }))
}

fn cmd_measure(args: MeasureArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => cellheight::SizingConfig::from_path(path)?,
        None => cellheight::SizingConfig::default(),
    };
    let ctx = cellheight::LayoutContext::new(args.width, args.columns, args.authenticated)?;

    let mut items = read_items_json(&args.in_path)?;
    if let Some(family) = args.family {
        items.retain(|item| family.includes(item.tag));
    }

    let measurers = RefCell::new(make_measurers(args.font.as_deref())?);
    let next_measurer = || {
        let mut make = measurers.borrow_mut();
        (*make)()
    };
    let body_style = config.text.body_style;
    let mut feed = cellheight::FeedSizer::new(
        &config,
        || cellheight::TextSurface::new(next_measurer(), body_style),
        next_measurer,
    );

    let slot: Rc<RefCell<Option<cellheight::JobOutput>>> = Rc::default();
    let sink = Rc::clone(&slot);
    feed.process_cells(items, ctx, move |out| *sink.borrow_mut() = Some(out));
    feed.pump();

    let out = slot
        .borrow_mut()
        .take()
        .context("measurement did not complete")?;
    let json = serde_json::to_string_pretty(&out.reports).with_context(|| "serialize reports")?;
    println!("{json}");
    if out.defaulted() > 0 {
        eprintln!("{} item(s) sized with a fallback height", out.defaulted());
    }
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&cellheight::SizingConfig::default())
        .with_context(|| "serialize default config")?;
    println!("{json}");
    Ok(())
}
