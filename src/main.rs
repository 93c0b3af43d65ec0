//! Drone Coverage CLI - Run a placement search from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;

use drone_coverage::{
    compute::{GridGeometry, SwarmOptimizer},
    report::{self, ResultExport},
    schema::{ProbabilityGrid, SearchConfig},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return;
    }

    if args.iter().any(|a| a == "--example") {
        print_example_config();
        return;
    }

    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--output" {
            match rest.next() {
                Some(path) => output_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--output requires a path");
                    std::process::exit(1);
                }
            }
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }

    // Load configuration
    let config: SearchConfig = match &config_path {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => SearchConfig::default(),
    };

    // Load or generate probability map
    let grid_path = config_path
        .as_ref()
        .map(|p| p.with_extension("grid.json"))
        .filter(|p| p.exists());
    let grid = match grid_path {
        Some(path) => {
            let grid_str = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Error reading grid file: {}", e);
                std::process::exit(1);
            });
            ProbabilityGrid::from_json(&grid_str).unwrap_or_else(|e| {
                log::warn!("rejected grid {}: {}", path.display(), e);
                eprintln!("Error parsing grid: {}", e);
                std::process::exit(1);
            })
        }
        None => config.grid.generate().unwrap_or_else(|e| {
            eprintln!("Error generating grid: {}", e);
            std::process::exit(1);
        }),
    };

    let geometry = GridGeometry::new(grid.size(), config.area_size, config.detection_radius);

    println!("Drone Coverage Search");
    println!("=====================");
    println!("Area: {} x {}", config.area_size, config.area_size);
    println!(
        "Grid: {}x{} (cell size {:.2}, detection radius {} = {} cells)",
        grid.size(),
        grid.size(),
        geometry.scale,
        config.detection_radius,
        geometry.radius_cells
    );
    println!("Drones: {}", config.num_agents);
    println!(
        "Swarm: {} particles, {} iterations",
        config.swarm.num_particles, config.swarm.max_iterations
    );
    println!();

    let mut optimizer = SwarmOptimizer::new(config.clone(), grid).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Running search...");
    let interval = (config.swarm.max_iterations / 10).max(1);
    let result = optimizer.run_with_callback(|progress| {
        // Print progress every 10%
        if progress.iteration % interval == 0 {
            println!(
                "  Iteration {}/{}: best={:.6}, iteration best={:.6}, avg={:.6}",
                progress.iteration,
                progress.total_iterations,
                progress.best_score,
                progress.iteration_best,
                progress.avg_score
            );
        }
    });

    println!();
    print!("{}", report::summary(&result, optimizer.evaluator().geometry()));

    if let Some(path) = output_path {
        let export = ResultExport::new(&config, &result, optimizer.evaluator());
        if let Err(e) = report::save_json(&path, &export) {
            eprintln!("Error writing {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Result written to {}", path.display());
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [--output result.json]", program);
    eprintln!();
    eprintln!("Search drone placements that cover a probability map.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Search configuration (defaults when omitted)");
    eprintln!("  --output     Write best placement, coverage mask and history as JSON");
    eprintln!("  --example    Print the default configuration");
    eprintln!();
    eprintln!("A probability map is read from <config>.grid.json when present,");
    eprintln!("otherwise a random normalized map is generated.");
}

fn print_example_config() {
    let config = SearchConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
