//! Company name → ticker resolution

/// Suffix appended to names that match no curated entry.
pub const FALLBACK_SUFFIX: &str = ".NS";

/// Curated substring table. Checked in order, so more specific
/// keys must precede their prefixes ("tata steel" before "tata").
const CURATED_SYMBOLS: &[(&str, &str)] = &[
    ("tata steel", "TATASTEEL.NS"),
    ("tata motors", "TATAMOTORS.NS"),
    ("tata", "TCS.NS"),
    ("reliance", "RELIANCE.NS"),
    ("infosys", "INFY"),
    ("wipro", "WIT"),
    ("hdfc", "HDFCBANK.NS"),
    ("icici", "ICICIBANK.NS"),
    ("suzlon", "SUZLON.NS"),
    ("adani", "ADANIENT.NS"),
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("exxon", "XOM"),
    ("chevron", "CVX"),
    ("shell", "SHEL"),
    ("bp", "BP"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("nvidia", "NVDA"),
];

/// Immutable symbol lookup, injected into the acquirer at construction.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<(String, String)>,
    fallback_suffix: String,
}

impl SymbolTable {
    pub fn new<I, K, V>(entries: I, fallback_suffix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
            fallback_suffix: fallback_suffix.to_string(),
        }
    }

    /// Case-insensitive substring match; first entry wins.
    pub fn resolve(&self, company_name: &str) -> String {
        let lower = company_name.to_lowercase();

        self.entries
            .iter()
            .find(|(key, _)| lower.contains(key.as_str()))
            .map(|(_, symbol)| symbol.clone())
            .unwrap_or_else(|| fallback_symbol(company_name, &self.fallback_suffix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new(CURATED_SYMBOLS.iter().copied(), FALLBACK_SUFFIX)
    }
}

/// Uppercased, whitespace-stripped name plus suffix.
pub fn fallback_symbol(company_name: &str, suffix: &str) -> String {
    let stripped: String = company_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{}{}", stripped.to_uppercase(), suffix)
}
