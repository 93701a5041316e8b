use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, TraceLevel, ViewArgs};
use dialoguer::{theme::ColorfulTheme, Input};
use dotenv::dotenv;
use pricedeck_core::{GroupKind, PriceSource, RenderParams, Selection, Session, YahooFinance};
use repl::Command;
use tracing::{debug, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;
use ui::ProgressSource;

mod cli;
mod repl;
mod ui;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

fn source(cli: &Cli) -> Result<ProgressSource<YahooFinance>> {
    let http_client = reqwest::ClientBuilder::new()
        .user_agent(&cli.user_agent)
        .build()?;
    Ok(ProgressSource::new(
        YahooFinance::new(http_client).with_base_url(&cli.base_url),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    trace!("Command line input recorded: {cli:#?}");

    // cli framework:
    // "> pricedeck <COMMAND>"
    match &cli.command {
        // "> pricedeck groups"
        Commands::Groups => {
            let groups: Vec<_> = GroupKind::ALL.iter().map(|kind| kind.group()).collect();
            ui::print_groups(&groups);
        }

        // "> pricedeck view [--days N] [--us a,b] [--us-range MIN,MAX] ... [--chart]"
        Commands::View(args) => {
            let params = args.params()?;
            let mut session = Session::new(source(&cli)?);
            render(&mut session, &params, args.chart).await;
        }

        // "> pricedeck session [same flags as view]"
        Commands::Session(args) => {
            let session = Session::new(source(&cli)?);
            interact(session, args).await?;
        }
    }

    Ok(())
}

/// One pass over every group; each group prints its table or its message.
async fn render<S: PriceSource>(
    session: &mut Session<ProgressSource<S>>,
    params: &RenderParams,
    chart: bool,
) {
    let days = params.lookback.days();
    let time = std::time::Instant::now();

    session.source().begin();
    let slots = session.render(params).await;
    session.source().finish();
    debug!("Render finished. Elapsed time: {} ms", time.elapsed().as_millis());

    ui::print_title(days);
    for (kind, slot) in &slots {
        if let Some(group) = session.group(*kind) {
            ui::print_slot(group, slot, days, chart);
        }
    }
}

async fn interact<S: PriceSource>(
    mut session: Session<ProgressSource<S>>,
    args: &ViewArgs,
) -> Result<()> {
    let mut params = args.params()?;
    render(&mut session, &params, args.chart).await;
    println!("{}", repl::HELP);

    let theme = ColorfulTheme::default();
    loop {
        let line: String = Input::with_theme(&theme)
            .with_prompt(format!("pricedeck [{}]", ui::group_names()))
            .allow_empty(true)
            .interact_text()?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        trace!("Session command: {command:?}");

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", repl::HELP),
            Command::Chart(kind) => {
                let selection = params
                    .selection(kind)
                    .cloned()
                    .unwrap_or_else(|| Selection::defaults(&kind.group()));
                match session.render_group(kind, params.lookback, &selection).await {
                    Ok(view) => println!("{}", view.chart),
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            command => match command.apply(&mut params) {
                Ok(true) => render(&mut session, &params, args.chart).await,
                Ok(false) => {}
                Err(e) => println!("{e}"),
            },
        }
    }

    info!("Session closed");
    Ok(())
}
