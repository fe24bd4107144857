use serde::{Deserialize, Deserializer};

/// Custom default value for serde.
/// Usage: `#[serde(default="default_one")]`
pub fn default_one() -> usize {
    1
}

/// Enforces the constraint that the given count is at least one.
///
/// Usage: `#[serde(deserialize_with = "deserialize_count")]`
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = usize::deserialize(deserializer)?;
    if value == 0 {
        Err(serde::de::Error::custom("count must be at least one"))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn count() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        #[serde(transparent)]
        struct Container {
            #[serde(deserialize_with = "deserialize_count")]
            value: usize,
        }

        for valid_str in ["1", "2", " \n 30 \t", "18446744073709551615"] {
            let _valid_value: Container = dbg!(serde_json::from_str(&dbg!(valid_str))).unwrap();
        }
        for invalid_str in ["0", "-1", "1.5", "\"3\""] {
            let invalid_error: Result<Container, _> = dbg!(serde_json::from_str(&dbg!(invalid_str)));
            if let Err(msg) = &invalid_error {
                eprintln!("{msg}"); // Check error message formatting.
            }
            assert!(invalid_error.is_err());
        }
    }
}
