use serde::Serialize;

/// USD→KRW rate used when the upstream rate cannot be resolved.
pub const FALLBACK_USD_KRW_RATE: f64 = 1350.0;

/// One exchange's observation of one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerQuote {
    /// Uppercase asset code ("BTC") or trading pair ("BTCUSDT") as reported
    pub symbol: String,
    /// Price in the exchange's native quote currency, always > 0
    pub price: f64,
    pub change_percent_24h: f64,
    pub volume_24h: f64,
}

impl TickerQuote {
    /// Build a quote, rejecting readings without a usable price.
    pub fn new(
        symbol: impl Into<String>,
        price: Option<f64>,
        change_percent_24h: f64,
        volume_24h: f64,
    ) -> Option<Self> {
        let price = price.filter(|p| p.is_finite() && *p > 0.0)?;

        Some(Self {
            symbol: symbol.into().to_uppercase(),
            price,
            change_percent_24h,
            volume_24h,
        })
    }
}

/// USD→KRW conversion factor, flagged when it is the stale default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub usd_krw: f64,
    pub is_fallback: bool,
}

impl ExchangeRate {
    /// Accept a resolved value if it is a positive finite number.
    pub fn resolved(value: f64) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self {
                usd_krw: value,
                is_fallback: false,
            })
        } else {
            None
        }
    }

    pub fn fallback() -> Self {
        Self {
            usd_krw: FALLBACK_USD_KRW_RATE,
            is_fallback: true,
        }
    }
}
