//! Layout state carried in the page URL.
//!
//! Only the parts of the query string that affect layout are handled here:
//! `hidden_modules` (comma-separated instance keys) and `tab`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const HIDDEN_MODULES_PARAM: &str = "hidden_modules";
const SELECTED_TAB_PARAM: &str = "tab";

/// Layout-related URL state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfiguration {
    pub hidden_modules: BTreeSet<String>,
    pub selected_tab: Option<String>,
}

impl UrlConfiguration {
    /// Parse from a query string, with or without the leading `?`.
    ///
    /// Unrelated parameters are ignored. Repeated parameters accumulate for
    /// `hidden_modules`; the last `tab` wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut config = Self::default();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                HIDDEN_MODULES_PARAM => {
                    config.hidden_modules.extend(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|key| !key.is_empty())
                            .map(str::to_string),
                    );
                }
                SELECTED_TAB_PARAM => {
                    let tab = value.trim();
                    config.selected_tab = (!tab.is_empty()).then(|| tab.to_string());
                }
                _ => {}
            }
        }
        config
    }

    /// Serialize back to a query string (no leading `?`).
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.hidden_modules.is_empty() {
            let joined = self
                .hidden_modules
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",");
            serializer.append_pair(HIDDEN_MODULES_PARAM, &joined);
        }
        if let Some(tab) = &self.selected_tab {
            serializer.append_pair(SELECTED_TAB_PARAM, tab);
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hidden_modules_and_tab() {
        let config = UrlConfiguration::from_query(
            "?models=sst2&hidden_modules=Main_Data%20Table,Predictions_Scalars&tab=Predictions",
        );
        assert_eq!(
            config.hidden_modules.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Main_Data Table", "Predictions_Scalars"]
        );
        assert_eq!(config.selected_tab.as_deref(), Some("Predictions"));
    }

    #[test]
    fn empty_values_are_dropped() {
        let config = UrlConfiguration::from_query("hidden_modules=,,&tab=");
        assert!(config.hidden_modules.is_empty());
        assert_eq!(config.selected_tab, None);
    }

    #[test]
    fn round_trips_through_query() {
        let config = UrlConfiguration {
            hidden_modules: ["Main_Data Table".to_string(), "Main_Color".to_string()]
                .into_iter()
                .collect(),
            selected_tab: Some("Main".to_string()),
        };
        let query = config.to_query();
        assert_eq!(
            query,
            "hidden_modules=Main_Color%2CMain_Data+Table&tab=Main"
        );
        assert_eq!(UrlConfiguration::from_query(&query), config);
    }
}
