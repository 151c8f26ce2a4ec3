//! Option contract definitions
//!
//! Contract terms and market quotes for a single European option. Time to
//! maturity is carried explicitly in years; there is no evaluation date.

use serde::{Deserialize, Serialize};

use super::error::{PricingError, PricingResult};

/// Day count basis used to turn calendar days into year fractions (ACT/365)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Terms of a European option contract
///
/// Fields are private so every instance has passed validation.
/// Deserialization goes through [`ContractTerms::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContractTerms")]
pub struct ContractTerms {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    div_yield: f64,
    side: OptionType,
}

impl ContractTerms {
    /// Create validated contract terms
    ///
    /// `time` is in years, `rate` and `div_yield` are continuously
    /// compounded decimals (0.05 = 5%).
    pub fn new(
        spot: f64,
        strike: f64,
        time: f64,
        rate: f64,
        div_yield: f64,
        side: OptionType,
    ) -> PricingResult<Self> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::domain(format!("spot must be positive, got {spot}")));
        }
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::domain(format!("strike must be positive, got {strike}")));
        }
        if !time.is_finite() || time <= 0.0 {
            return Err(PricingError::domain(format!(
                "time to maturity must be positive, got {time}"
            )));
        }
        if !rate.is_finite() {
            return Err(PricingError::domain("rate must be finite"));
        }
        if !div_yield.is_finite() || div_yield < 0.0 {
            return Err(PricingError::domain(format!(
                "dividend yield must be non-negative, got {div_yield}"
            )));
        }

        Ok(Self {
            spot,
            strike,
            time,
            rate,
            div_yield,
            side,
        })
    }

    /// Create terms from a calendar day count
    pub fn from_days(
        spot: f64,
        strike: f64,
        days: u32,
        rate: f64,
        div_yield: f64,
        side: OptionType,
    ) -> PricingResult<Self> {
        Self::new(spot, strike, days as f64 / DAYS_PER_YEAR, rate, div_yield, side)
    }

    /// Same contract on the other side (or the same side)
    pub fn with_side(&self, side: OptionType) -> Self {
        Self { side, ..*self }
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to maturity in years
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn div_yield(&self) -> f64 {
        self.div_yield
    }

    pub fn side(&self) -> OptionType {
        self.side
    }

    /// S * exp(-qT)
    pub fn discounted_spot(&self) -> f64 {
        self.spot * (-self.div_yield * self.time).exp()
    }

    /// K * exp(-rT)
    pub fn discounted_strike(&self) -> f64 {
        self.strike * (-self.rate * self.time).exp()
    }

    /// Forward price F = S * exp((r - q)T)
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.div_yield) * self.time).exp()
    }

    /// Call minus put under put-call parity: S*e^(-qT) - K*e^(-rT)
    pub fn parity_spread(&self) -> f64 {
        self.discounted_spot() - self.discounted_strike()
    }
}

#[derive(Deserialize)]
struct RawContractTerms {
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    div_yield: f64,
    side: OptionType,
}

impl TryFrom<RawContractTerms> for ContractTerms {
    type Error = PricingError;

    fn try_from(raw: RawContractTerms) -> PricingResult<Self> {
        Self::new(raw.spot, raw.strike, raw.time, raw.rate, raw.div_yield, raw.side)
    }
}

/// Observed market price of an option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMarketQuote")]
pub struct MarketQuote {
    terms: ContractTerms,
    price: f64,
}

impl MarketQuote {
    pub fn new(terms: ContractTerms, price: f64) -> PricingResult<Self> {
        if !price.is_finite() || price <= 0.0 {
            return Err(PricingError::domain(format!(
                "{} market price must be positive, got {price}",
                terms.side()
            )));
        }
        Ok(Self { terms, price })
    }

    pub fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// No-arbitrage price bounds (lower, upper) for a European option
    ///
    /// Call: [max(0, S*e^(-qT) - K*e^(-rT)), S*e^(-qT)]
    /// Put:  [max(0, K*e^(-rT) - S*e^(-qT)), K*e^(-rT)]
    pub fn arbitrage_bounds(&self) -> (f64, f64) {
        let spot_pv = self.terms.discounted_spot();
        let strike_pv = self.terms.discounted_strike();
        match self.terms.side() {
            OptionType::Call => ((spot_pv - strike_pv).max(0.0), spot_pv),
            OptionType::Put => ((strike_pv - spot_pv).max(0.0), strike_pv),
        }
    }

    /// Check the quote against its no-arbitrage bounds
    pub fn check_arbitrage(&self) -> PricingResult<()> {
        let (lower, upper) = self.arbitrage_bounds();
        if self.price < lower {
            return Err(PricingError::domain(format!(
                "{} price {:.6} is below its no-arbitrage lower bound {:.6}",
                self.terms.side(),
                self.price,
                lower
            )));
        }
        if self.price > upper {
            return Err(PricingError::domain(format!(
                "{} price {:.6} is above its no-arbitrage upper bound {:.6}",
                self.terms.side(),
                self.price,
                upper
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawMarketQuote {
    terms: ContractTerms,
    price: f64,
}

impl TryFrom<RawMarketQuote> for MarketQuote {
    type Error = PricingError;

    fn try_from(raw: RawMarketQuote) -> PricingResult<Self> {
        Self::new(raw.terms, raw.price)
    }
}
