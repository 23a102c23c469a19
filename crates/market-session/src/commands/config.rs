//! # Config Commands

use market_core::Money;

use crate::state::SessionConfig;

/// Gets the active session configuration.
pub fn get_config(config: &SessionConfig) -> SessionConfig {
    config.clone()
}

/// Formats an amount in centavos for display, e.g. `R$ 12.34`.
pub fn format_amount(config: &SessionConfig, cents: i64) -> String {
    config.format_currency(Money::from_cents(cents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        let config = SessionConfig::in_memory();
        assert_eq!(format_amount(&config, 45090), "R$ 450.90");
        assert!(get_config(&config).storage.in_memory);
    }
}
