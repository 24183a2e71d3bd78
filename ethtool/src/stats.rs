// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Raw counter map parsed from `ethtool -S` text.

use std::collections::BTreeMap;
use std::fmt::Display;

use tracing::trace;

/// Flat map of counter name to counter value, as printed by `ethtool -S`.
///
/// Values are kept as (trimmed) text: whether a value is a usable integer is only decided
/// when a count is extracted from the map (see [`CounterMap::packets`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterMap(BTreeMap<String, String>);

impl CounterMap {
    /// Parse the output of `ethtool -S`.
    ///
    /// Every line is split on its first colon.  Lines without a colon are ignored, and so are
    /// section headings: lines with nothing at all after the colon and a space anywhere before
    /// it, such as `NIC statistics:`.  The test is on the raw line, so an indented counter
    /// without a value is a heading too.  All other lines map the trimmed name to the trimmed
    /// value; when a name repeats, the last line wins.
    ///
    /// Parsing never fails.  Garbage in gives an empty (or partial) map out.
    #[must_use]
    pub fn parse(text: &str) -> CounterMap {
        let mut map = BTreeMap::new();
        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if value.is_empty() && key.contains(' ') {
                trace!("skipping section heading '{}'", key.trim());
                continue;
            }
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
        CounterMap(map)
    }

    /// Look up the raw value of a counter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over all counters, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for CounterMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in &self.0 {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CounterMap;
    use pretty_assertions::assert_eq;

    const MLX5_REP: &str = "NIC statistics:
     rx_packets: 1034
     rx_bytes: 94312
     tx_packets: 77
     tx_bytes: 5390
     vport_rx_packets: 0
     vport_tx_packets: 0
";

    #[test]
    fn parse_skips_heading() {
        let map = CounterMap::parse(MLX5_REP);
        assert_eq!(map.len(), 6);
        assert_eq!(map.get("rx_packets"), Some("1034"));
        assert_eq!(map.get("tx_bytes"), Some("5390"));
        assert_eq!(map.get("NIC statistics"), None);
    }

    #[test]
    fn parse_ignores_lines_without_colon() {
        let map = CounterMap::parse("no colon here\n\n   \nrx_packets: 3\n");
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("rx_packets", "3")]);
    }

    #[test]
    fn parse_keeps_empty_value_without_space_in_key() {
        let map = CounterMap::parse("rx_weird:\n");
        assert_eq!(map.get("rx_weird"), Some(""));
    }

    #[test]
    fn parse_skips_indented_line_without_value() {
        let map = CounterMap::parse(
            "NIC statistics:\n     rx_queue_0_xdp_packets:\n     rx_queue_1_xdp_packets: 15\n",
        );
        assert_eq!(map.get("rx_queue_0_xdp_packets"), None);
        assert_eq!(map.get("rx_queue_1_xdp_packets"), Some("15"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn parse_splits_on_first_colon_only() {
        let map = CounterMap::parse("link: up: 10G\n");
        assert_eq!(map.get("link"), Some("up: 10G"));
    }

    #[test]
    fn parse_last_write_wins() {
        let map = CounterMap::parse("rx_packets: 1\nrx_packets: 2\n");
        assert_eq!(map.get("rx_packets"), Some("2"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn parse_empty_input() {
        assert!(CounterMap::parse("").is_empty());
    }

    #[test]
    fn parse_single_line_contract() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|(key, value): (String, String)| {
                // restrict to well formed "key: value" lines
                if key.contains([':', '\n', '\r'])
                    || value.contains(['\n', '\r'])
                    || key.trim().is_empty()
                    || key.trim().contains(char::is_whitespace)
                {
                    return;
                }
                let map = CounterMap::parse(&format!("{key}: {value}"));
                assert_eq!(map.len(), 1);
                assert_eq!(map.get(key.trim()), Some(value.trim()));
            });
    }

    #[test]
    fn parse_is_idempotent() {
        bolero::check!()
            .with_type()
            .cloned()
            .for_each(|text: String| {
                assert_eq!(CounterMap::parse(&text), CounterMap::parse(&text));
            });
    }

    #[test]
    fn display_reparses_to_same_map() {
        let map = CounterMap::parse(MLX5_REP);
        assert_eq!(CounterMap::parse(&map.to_string()), map);
    }
}
