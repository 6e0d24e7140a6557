//! dash-runner: headless front end for the trust dashboard core.
//!
//! Usage:
//!   dash-runner --seed 42 --db dash.db --generate
//!   dash-runner --db dash.db --ipc-mode
//!
//! In IPC mode each stdin line is one JSON request, e.g.
//!   {"cmd":"policy_simulation","min_trust_index":75}
//! and each stdout line is {"ok": <body>} or {"error": "...", "retryable": bool}.

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use trustdash_core::{
    config::DashConfig,
    error::DashError,
    generator::DataGenerationRequest,
    request::DashRequest,
    service::DashboardService,
    store::DashStore,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let generate = args.iter().any(|a| a == "--generate");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir");

    let config = match data_dir {
        Some(dir) => DashConfig::load(dir)?,
        None => DashConfig::default(),
    };

    let defaults = config.generation.defaults.clone();
    let request = DataGenerationRequest {
        num_users:    parse_arg(&args, "--users", defaults.num_users),
        num_sellers:  parse_arg(&args, "--sellers", defaults.num_sellers),
        num_orders:   parse_arg(&args, "--orders", defaults.num_orders),
        num_reviews:  parse_arg(&args, "--reviews", defaults.num_reviews),
        num_disputes: parse_arg(&args, "--disputes", defaults.num_disputes),
        seed:         parse_arg(&args, "--seed", defaults.seed),
    };

    if !ipc_mode {
        println!("Trust Dashboard: dash-runner");
        println!("  db:        {db}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in defaults)"));
        println!("  seed:      {}", request.seed);
        println!();
    }

    let store = DashStore::open(db)?;
    store.migrate()?;
    let service = DashboardService::new(store, config);

    // An in-memory store is always empty at start, so seed it.
    if generate || db == ":memory:" {
        let summary = service.generate_data(&request, chrono::Utc::now())?;
        log::info!("Generated dataset version {}", summary.version);
    }

    if ipc_mode {
        run_ipc_loop(&service)?;
    } else {
        print_summary(&service)?;
    }
    Ok(())
}

fn run_ipc_loop(service: &DashboardService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }
        if buffer.trim() == "quit" {
            break;
        }

        let response = match serde_json::from_str::<DashRequest>(&buffer) {
            Ok(request) => match service.handle(request, chrono::Utc::now()) {
                Ok(body) => serde_json::json!({ "ok": body }),
                Err(e) => error_json(&e),
            },
            Err(e) => serde_json::json!({ "error": e.to_string(), "retryable": false }),
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn error_json(e: &DashError) -> serde_json::Value {
    if e.is_retryable() {
        log::warn!("Storage unavailable: {e}");
    }
    serde_json::json!({ "error": e.to_string(), "retryable": e.is_retryable() })
}

fn print_summary(service: &DashboardService) -> Result<()> {
    let totals = service.store.entity_totals()?;
    let m = service.trust_metrics()?;
    let policy = service.policy_simulation(&service.config().policy.defaults)?;

    println!("=== DATASET ===");
    println!("  users:     {}", totals.users);
    println!("  sellers:   {}", totals.sellers);
    println!("  orders:    {}", totals.orders);
    println!("  reviews:   {}", totals.reviews);
    println!("  disputes:  {}", totals.disputes);
    println!();
    println!("=== TRUST METRICS ===");
    println!("  trust index:          {:.2}", m.trust_index);
    println!("  dispute rate:         {:.2}%", m.dispute_rate);
    println!("  refund ratio:         {:.2}%", m.refund_ratio);
    println!("  user satisfaction:    {:.2}%", m.user_satisfaction_avg);
    println!("  repeat purchase:      {:.2}%", m.repeat_purchase_uplift);
    println!("  seller performance:   {:.2}", m.seller_performance_avg);
    println!();
    println!("=== TOP CATEGORIES ===");
    let categories = service.category_analysis()?;
    if categories.is_empty() {
        println!("  (no sellers)");
    }
    for c in categories.iter().take(5) {
        println!(
            "  {:<16} trust {:>6.2} | fulfillment {:.3} | sellers {}",
            c.category, c.avg_trust_index, c.avg_fulfillment_rate, c.total_sellers
        );
    }
    println!();
    println!("=== DEFAULT POLICY ===");
    let impact = &policy.impact_analysis;
    println!(
        "  compliant {} / {} ({:.1}%), orders at risk {}",
        impact.compliant_sellers, impact.total_sellers, impact.compliance_rate, impact.orders_at_risk
    );
    println!(
        "  action: {:?}, estimated trust improvement {:.2}",
        policy.recommendations.action, policy.recommendations.estimated_trust_improvement
    );
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
