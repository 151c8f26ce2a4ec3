//! vanilla-risk CLI
//!
//! Implied volatility, Greeks and Heston prices for a call/put pair.
//! Defaults reproduce a 2-day at-the-money index option example.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use vanilla_risk::prelude::*;

/// Option analytics for a European call/put pair
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Spot price
    #[arg(long, default_value_t = 24756.75)]
    spot: f64,

    /// Strike price
    #[arg(long, default_value_t = 24750.0)]
    strike: f64,

    /// Calendar days to expiry
    #[arg(long, default_value_t = 2)]
    days: u32,

    /// Risk-free rate in percent (5 = 5%)
    #[arg(long, default_value_t = 5.0)]
    rate: f64,

    /// Dividend yield in percent
    #[arg(long, default_value_t = 0.0)]
    div_yield: f64,

    /// Call option market price
    #[arg(long, default_value_t = 177.15)]
    call_price: f64,

    /// Put option market price
    #[arg(long, default_value_t = 214.35)]
    put_price: f64,

    /// Heston initial variance (requires --theta; otherwise seeded from IV²)
    #[arg(long, requires = "theta")]
    v0: Option<f64>,

    /// Heston long-term variance (requires --v0)
    #[arg(long, requires = "v0")]
    theta: Option<f64>,

    /// Heston mean reversion speed
    #[arg(long, default_value_t = 2.0)]
    kappa: f64,

    /// Heston volatility of variance
    #[arg(long, default_value_t = 0.5)]
    sigma_v: f64,

    /// Heston spot/variance correlation
    #[arg(long, default_value_t = -0.75, allow_negative_numbers = true)]
    rho: f64,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Prompt for every input on stdin
    #[arg(long, default_value_t = false)]
    interactive: bool,

    /// Debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn heston_spec(&self) -> HestonSpec {
        match (self.v0, self.theta) {
            (Some(v0), Some(theta)) => {
                HestonSpec::Explicit(HestonParams::new(v0, self.kappa, theta, self.sigma_v, self.rho))
            }
            _ => HestonSpec::SeededFromImpliedVol {
                kappa: self.kappa,
                sigma: self.sigma_v,
                rho: self.rho,
            },
        }
    }

    /// Overwrite inputs from stdin, keeping the current value on empty input
    fn prompt_all(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();

        self.spot = prompt(&mut input, "Spot price (S)", self.spot)?;
        self.strike = prompt(&mut input, "Strike price (K)", self.strike)?;
        self.rate = prompt(&mut input, "Risk-free rate (%)", self.rate)?;
        self.days = prompt(&mut input, "Days to expiry", self.days as f64)?.max(0.0).round() as u32;
        self.div_yield = prompt(&mut input, "Dividend yield (%)", self.div_yield)?;
        self.call_price = prompt(&mut input, "Call option market price", self.call_price)?;
        self.put_price = prompt(&mut input, "Put option market price", self.put_price)?;

        println!("\n-- Heston Model Parameters (v0/theta blank = seed from IV) --");
        self.v0 = prompt_optional(&mut input, "Initial variance v0", self.v0)?;
        self.theta = prompt_optional(&mut input, "Long-term variance theta", self.theta)?;
        self.kappa = prompt(&mut input, "Mean reversion speed kappa", self.kappa)?;
        self.sigma_v = prompt(&mut input, "Volatility of variance sigma", self.sigma_v)?;
        self.rho = prompt(&mut input, "Correlation rho", self.rho)?;
        Ok(())
    }
}

fn read_answer(input: &mut impl BufRead, label: &str, shown: &str) -> io::Result<String> {
    print!("{label} [{shown}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn parse_number(answer: &str) -> io::Result<f64> {
    answer
        .parse()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("not a number: {answer}")))
}

fn prompt(input: &mut impl BufRead, label: &str, default: f64) -> io::Result<f64> {
    let answer = read_answer(input, label, &default.to_string())?;
    if answer.is_empty() {
        Ok(default)
    } else {
        parse_number(&answer)
    }
}

fn prompt_optional(input: &mut impl BufRead, label: &str, default: Option<f64>) -> io::Result<Option<f64>> {
    let shown = default.map(|v| v.to_string()).unwrap_or_default();
    let answer = read_answer(input, label, &shown)?;
    if answer.is_empty() {
        Ok(default)
    } else {
        parse_number(&answer).map(Some)
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let file = File::open(path).map_err(|e| format!("cannot open {}: {e}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("invalid config {}: {e}", path.display()))
}

fn print_leg(side: OptionType, leg: &PricingResult<LegReport>) {
    let title = match side {
        OptionType::Call => "Call",
        OptionType::Put => "Put",
    };

    let leg = match leg {
        Ok(leg) => leg,
        Err(e) => {
            println!("\n{title}: {e}");
            return;
        }
    };

    match leg.implied_vol.volatility {
        Some(iv) => println!(
            "\nImplied Volatility ({title}): {:.2}% ({} iterations, {:?})",
            iv * 100.0,
            leg.implied_vol.iterations,
            leg.implied_vol.method
        ),
        None => println!("\n{title} IV not available"),
    }

    match leg.greeks {
        Some(greeks) => {
            let g = greeks.for_reporting();
            println!("Black-Scholes Greeks ({title}):");
            println!(
                "  Delta: {:.4}, Gamma: {:.5}, Theta: {:.4}, Vega: {:.4}, Rho: {:.4}",
                g.delta, g.gamma, g.theta, g.vega, g.rho
            );
        }
        None => println!("{title} Greeks could not be calculated"),
    }

    match &leg.heston {
        Some(heston) => {
            println!("Heston Model {title} Price: {:.2}", heston.npv);
            if !heston.params.feller_condition() {
                println!("  (Feller condition 2κθ ≥ σ² violated)");
            }
            if let Some(warning) = heston.warning {
                println!("  warning: {warning}");
            }
        }
        None => println!("Heston Model {title} Price could not be calculated"),
    }
}

fn main() -> ExitCode {
    let mut args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    if args.interactive {
        if let Err(e) = args.prompt_all() {
            eprintln!("Input error: {e}");
            return ExitCode::FAILURE;
        }
    }

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let facade = match PricingFacade::new(config) {
        Ok(facade) => facade,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let call_terms = match ContractTerms::from_days(
        args.spot,
        args.strike,
        args.days,
        args.rate / 100.0,
        args.div_yield / 100.0,
        OptionType::Call,
    ) {
        Ok(terms) => terms,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let put_terms = call_terms.with_side(OptionType::Put);

    let report = facade.evaluate_with(
        call_terms,
        put_terms,
        args.call_price,
        args.put_price,
        &args.heston_spec(),
    );

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Serialization error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Option Analytics");
        println!("================");
        println!(
            "Spot: {:.2}  Strike: {:.2}  Expiry: {} days  Rate: {:.2}%  Div: {:.2}%",
            args.spot, args.strike, args.days, args.rate, args.div_yield
        );
        print_leg(OptionType::Call, &report.call);
        print_leg(OptionType::Put, &report.put);
    }

    if report.call.is_err() && report.put.is_err() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
