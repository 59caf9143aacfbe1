//! Parsing and sanity checks shared by the primary REST responses and the
//! proxy's JSON strings.
//!
//! Ticker: `{ "lastPrice": "5.12", "priceChangePercent": "-1.3", ... }`
//! Klines: `[[openTime, "open", "high", "low", "close", "volume", ...], ...]`

use crate::domain::errors::ValidationError;
use crate::domain::market_data::{Candle, OHLCV, Price, TickerQuote, Timestamp, Volume};
use serde_json::Value;

/// Numeric value carried as a JSON number or a decimal string.
/// Anything unparsable or non-finite becomes `0.0`.
pub fn safe_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn parse_json(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::MalformedJson(e.to_string()))
}

pub fn parse_ticker(payload: &Value) -> Result<TickerQuote, ValidationError> {
    let field = |name: &str| payload.get(name).map(safe_f64).unwrap_or(0.0);

    let price = Price::from(field("lastPrice"));
    if !price.is_usable() {
        return Err(ValidationError::ZeroPrice);
    }

    Ok(TickerQuote { price, change_24h_percent: field("priceChangePercent") })
}

/// Candles oldest first; only the first six positions of each row are read.
pub fn parse_klines(payload: &Value) -> Result<Vec<Candle>, ValidationError> {
    let rows = payload.as_array().ok_or(ValidationError::NotAnArray)?;
    if rows.is_empty() {
        return Err(ValidationError::EmptyCandles);
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let fields = row
                .as_array()
                .filter(|fields| fields.len() >= 6)
                .ok_or(ValidationError::MalformedRow { index })?;

            let close = Price::from(safe_f64(&fields[4]));
            if !close.is_usable() {
                return Err(ValidationError::ZeroClose { index });
            }

            let ohlcv = OHLCV::new(
                Price::from(safe_f64(&fields[1])),
                Price::from(safe_f64(&fields[2])),
                Price::from(safe_f64(&fields[3])),
                close,
                Volume::from(safe_f64(&fields[5])),
            );
            Ok(Candle::new(Timestamp::from_millis(safe_f64(&fields[0]) as u64), ohlcv))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_f64_accepts_numbers_and_strings() {
        assert_eq!(safe_f64(&json!(4.5)), 4.5);
        assert_eq!(safe_f64(&json!(" 4.5 ")), 4.5);
        assert_eq!(safe_f64(&json!("abc")), 0.0);
        assert_eq!(safe_f64(&json!("inf")), 0.0);
        assert_eq!(safe_f64(&json!(null)), 0.0);
    }

    #[test]
    fn ticker_with_zero_price_is_rejected() {
        let payload = json!({ "lastPrice": "0", "priceChangePercent": "1.0" });
        assert_eq!(parse_ticker(&payload), Err(ValidationError::ZeroPrice));
        assert_eq!(parse_ticker(&json!({})), Err(ValidationError::ZeroPrice));
    }

    #[test]
    fn ticker_change_defaults_to_zero() {
        let quote = parse_ticker(&json!({ "lastPrice": 5.25 })).unwrap();
        assert_eq!(quote.price.value(), 5.25);
        assert_eq!(quote.change_24h_percent, 0.0);
    }

    #[test]
    fn klines_read_first_six_positions() {
        let payload = json!([
            [1700000000000u64, "5.0", "5.5", "4.9", "5.2", "1200.5", 1700000899999u64, "0", 10, "0", "0", "0"],
            [1700000900000u64, "5.2", "5.3", "5.1", "5.1", "800"]
        ]);
        let candles = parse_klines(&payload).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].timestamp.value(), 1_700_000_000_000);
        assert_eq!(candles[0].ohlcv.high.value(), 5.5);
        assert_eq!(candles[0].ohlcv.volume.value(), 1200.5);
        assert_eq!(candles[1].close(), 5.1);
    }

    #[test]
    fn klines_reject_bad_shapes() {
        assert_eq!(parse_klines(&json!({"code": -1121})), Err(ValidationError::NotAnArray));
        assert_eq!(parse_klines(&json!([])), Err(ValidationError::EmptyCandles));
        assert_eq!(
            parse_klines(&json!([[1, "1", "1", "1"]])),
            Err(ValidationError::MalformedRow { index: 0 })
        );
        assert_eq!(
            parse_klines(&json!([[1, "1", "1", "1", "1", "1"], [2, "1", "1", "1", "0", "1"]])),
            Err(ValidationError::ZeroClose { index: 1 })
        );
    }

    #[test]
    fn malformed_json_is_a_validation_error() {
        assert!(matches!(parse_json("{not json"), Err(ValidationError::MalformedJson(_))));
    }
}
