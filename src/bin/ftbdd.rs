use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::bail;
use color_eyre::Result;
use log::info;

use ftbdd::analysis::{BddStats, Benchmark};
use ftbdd::bdd::construct::BddConstructor;
use ftbdd::faulttree::{galileo, FaultTree};
use ftbdd::ordering::{
    BfsOrdering, DefaultOrdering, ManualOrdering, RandomOrdering, SubTreeComplexity, VariableOrdering,
};
use ftbdd::print::{BddPrinter, BenchmarkChart, FaultTreePrinter, FaultTreeStyle, PrettyPrint, RenderOptions};

#[derive(Debug, Parser)]
#[command(author, version, about = "Fault trees and their BDDs, drawn with Graphviz")]
struct Cli {
    /// Show debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Graphviz layout engine.
    #[arg(long, value_name = "NAME", default_value = "dot", global = true)]
    engine: String,

    /// Resolution of raster images.
    #[arg(long, value_name = "INT", global = true)]
    dpi: Option<u32>,

    /// Maximum drawing size in inches.
    #[arg(long, value_name = "W,H", value_parser = parse_size, global = true)]
    size: Option<(f64, f64)>,

    /// Image viewer for `--window`.
    #[arg(long, value_name = "PROGRAM", global = true)]
    viewer: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw a fault tree
    PrintTree {
        /// Galileo (.dft) file
        file: PathBuf,

        /// Basic events to switch on before drawing
        #[arg(long = "on", value_name = "EVENT")]
        on: Vec<String>,

        /// Directory with gate images (andgate.png, orgate.png, ...)
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        #[command(flatten)]
        output: Output,
    },

    /// Construct the BDD of a fault tree and draw it
    PrintBdd {
        /// Galileo (.dft) file
        file: PathBuf,

        #[command(flatten)]
        ordering: OrderingArgs,

        /// Draw the BDD as constructed, without minimising it
        #[arg(long)]
        no_minimise: bool,

        #[command(flatten)]
        output: Output,
    },

    /// Compare the BDD sizes produced by all orderings
    Bench {
        /// Galileo (.dft) file
        file: PathBuf,

        /// Seed for the random ordering
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,

        /// Also draw the results as a bar chart into this file
        #[arg(long, value_name = "FILE")]
        chart: Option<PathBuf>,
    },

    /// Show statistics about a fault tree
    Info {
        /// Galileo (.dft) file
        file: PathBuf,

        #[command(flatten)]
        ordering: OrderingArgs,
    },
}

#[derive(Debug, Args)]
struct Output {
    /// Output file; the format follows the extension (dot, svg, png, pdf, ...)
    #[arg(short, long, value_name = "FILE", conflicts_with = "window")]
    output: Option<PathBuf>,

    /// Open the drawing in an image viewer
    #[arg(long)]
    window: bool,
}

#[derive(Debug, Args)]
struct OrderingArgs {
    /// Variable ordering heuristic
    #[arg(long, value_enum, default_value = "bfs")]
    ordering: OrderingKind,

    /// Comma-separated event names for `--ordering manual`
    #[arg(long, value_name = "EVENTS", value_delimiter = ',')]
    order: Vec<String>,

    /// Seed for `--ordering random`
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum OrderingKind {
    Default,
    Manual,
    Random,
    /// Breadth-first, deepest events first
    Bfs,
    /// Breadth-first, shallowest events first
    BfsTopDown,
    /// Sub-tree complexity
    Complexity,
}

impl OrderingArgs {
    fn build(&self) -> Result<Box<dyn VariableOrdering>> {
        let ordering: Box<dyn VariableOrdering> = match self.ordering {
            OrderingKind::Default => Box::new(DefaultOrdering),
            OrderingKind::Manual => {
                if self.order.is_empty() {
                    bail!("--ordering manual needs --order");
                }
                Box::new(ManualOrdering::new(self.order.iter().cloned()))
            }
            OrderingKind::Random => Box::new(RandomOrdering { seed: self.seed }),
            OrderingKind::Bfs => Box::new(BfsOrdering::default()),
            OrderingKind::BfsTopDown => Box::new(BfsOrdering::top_to_bottom()),
            OrderingKind::Complexity => Box::new(SubTreeComplexity),
        };
        Ok(ordering)
    }
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s.split_once(',').ok_or("expected W,H")?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width: {}", e))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height: {}", e))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("size must be positive".to_string());
    }
    Ok((w, h))
}

fn emit(printer: &dyn PrettyPrint, output: &Output, options: &RenderOptions) -> Result<()> {
    if output.window {
        printer.print_to_window(options)?;
    } else if let Some(path) = &output.output {
        printer.print_to_file(path, options)?;
    } else {
        print!("{}", printer.to_dot(options)?);
    }
    Ok(())
}

fn show_info(tree: &FaultTree, ordering: &dyn VariableOrdering) -> Result<()> {
    println!("Fault tree:     {}", tree.name());
    println!("Top event:      {}", tree.gate(tree.top()).name());
    println!("Basic events:   {}", tree.num_events());
    println!("Gates:          {}", tree.num_gates() - tree.num_events());
    println!("Max depth:      {}", tree.max_depth());
    println!("Coherent:       {}", tree.is_coherent());
    println!("Top event now:  {}", tree.apply());

    let bdd = BddConstructor::new(tree).construct(ordering, true)?;
    println!("BDD ({}):", ordering.name());
    println!("    Size:        {}", BddStats::of(&bdd));
    println!("    Probability: {}", bdd.probability());
    println!("    Failing:     {} of 2^{} states", bdd.sat_count(tree.num_events()), tree.num_events());
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let defaults = RenderOptions::default();
    let options = RenderOptions {
        engine: args.engine.clone(),
        dpi: args.dpi,
        size: args.size.unwrap_or(defaults.size),
        viewer: args.viewer.clone(),
        ..defaults
    };

    let time_total = std::time::Instant::now();

    match &args.command {
        Command::PrintTree {
            file,
            on,
            image_dir,
            output,
        } => {
            let mut tree = galileo::read_file(file)?;
            for name in on {
                if tree.event(name).is_none() {
                    bail!("unknown basic event `{}`", name);
                }
                tree.set_state(name, true);
            }
            let style = FaultTreeStyle {
                image_dir: image_dir.clone(),
                ..FaultTreeStyle::default()
            };
            emit(&FaultTreePrinter::with_style(&tree, style), output, &options)?;
        }
        Command::PrintBdd {
            file,
            ordering,
            no_minimise,
            output,
        } => {
            let tree = galileo::read_file(file)?;
            let ordering = ordering.build()?;
            let bdd = BddConstructor::new(&tree).construct(ordering.as_ref(), !no_minimise)?;
            info!("BDD: {}", BddStats::of(&bdd));
            emit(&BddPrinter::new(&bdd), output, &options)?;
        }
        Command::Bench { file, seed, chart } => {
            let tree = galileo::read_file(file)?;
            let random = RandomOrdering { seed: *seed };
            let bfs_top_down = BfsOrdering::top_to_bottom();
            let bfs = BfsOrdering::default();
            let mut benchmark = Benchmark::new(&tree);
            benchmark.run(&[&DefaultOrdering, &random, &bfs_top_down, &bfs, &SubTreeComplexity])?;
            print!("{}", benchmark);
            if let Some(path) = chart {
                BenchmarkChart::new(&benchmark).print_to_file(path, &options)?;
            }
        }
        Command::Info { file, ordering } => {
            let tree = galileo::read_file(file)?;
            show_info(&tree, ordering.build()?.as_ref())?;
        }
    }

    info!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
