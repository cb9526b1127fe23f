//! Line-driven quote form.
//!
//! Each stdin line is one user action. Form edits and location picks go
//! through the debounced [`QuoteController`], so a burst of edits prints one
//! updated quote.
//!
//! ```text
//! type boundary | length 10 | breadth 8 | height 6   (use "-" to clear)
//! {"field":"height","value":6}                      (JSON form event)
//! pick 26.9 88.5                                     (select / drag location)
//! search siliguri
//! show
//! export <phone> <name...>                         (waits for a pending distance)
//! quit
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use quote_core::controller::{DisplaySink, QuoteController};
use quote_core::debounce::Debouncer;
use quote_core::display::{format_km, QuoteDisplay};
use quote_core::distance::{DistanceMeasurement, GeoPoint};
use quote_core::export::{export_quote, CustomerInfo, QuoteRelay};
use quote_core::geocoding::{NominatimSearch, PlaceSearch};
use quote_core::session::FormEvent;
use quote_core::settings::QuoteSettings;

use crate::commands::{print_json, print_outcome, print_places, relay_for, resolver};

/// Prints panel updates to stdout
struct ConsoleSink {
    json: bool,
}

impl DisplaySink for ConsoleSink {
    fn quote_updated(&self, display: &QuoteDisplay) {
        if self.json {
            if let Err(e) = print_json(display) {
                tracing::error!("Failed to print quote: {}", e);
            }
        } else {
            print!("{}", display);
        }
    }

    fn distance_updated(&self, measurement: &DistanceMeasurement, shipping_cost: &str) {
        if !self.json {
            println!(
                "Distance: {} km ({}), shipping cost {}",
                format_km(measurement.km),
                measurement.method.display_name(),
                shipping_cost
            );
        }
    }
}

#[derive(Debug, PartialEq)]
enum Action {
    Form(FormEvent),
    Pick(GeoPoint),
    Search(String),
    Show,
    Export { phone: String, name: String },
    Quit,
}

fn optional_number(value: &str) -> Result<Option<f64>> {
    if value == "-" {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| anyhow!("not a number: {}", value))
}

fn parse_action(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('{') {
        let event: FormEvent = serde_json::from_str(line)?;
        return Ok(Some(Action::Form(event)));
    }

    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let action = match command {
        "type" => Action::Form(FormEvent::WallType(match rest {
            "" | "-" => None,
            value => Some(value.to_string()),
        })),
        "length" => Action::Form(FormEvent::Length(optional_number(rest)?)),
        "breadth" => Action::Form(FormEvent::Breadth(optional_number(rest)?)),
        "height" => Action::Form(FormEvent::Height(optional_number(rest)?)),
        "pick" => {
            let mut parts = rest.split_whitespace();
            let (Some(lat), Some(lng)) = (parts.next(), parts.next()) else {
                return Err(anyhow!("usage: pick <lat> <lng>"));
            };
            Action::Pick(GeoPoint::new(lat.parse()?, lng.parse()?))
        }
        "search" => Action::Search(rest.to_string()),
        "show" => Action::Show,
        "export" => {
            let (phone, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Action::Export {
                phone: phone.to_string(),
                name: name.trim().to_string(),
            }
        }
        "quit" | "exit" => Action::Quit,
        other => return Err(anyhow!("unknown command: {}", other)),
    };
    Ok(Some(action))
}

pub async fn run(settings: QuoteSettings, json: bool, offline: bool) -> Result<()> {
    let console = Arc::new(ConsoleSink { json });
    let sink: Arc<dyn DisplaySink> = console.clone();
    let controller = QuoteController::new(settings.clone(), resolver(&settings, offline)?, sink);

    let places = Arc::new(NominatimSearch::new(&settings.geocoding)?);
    let search = Debouncer::spawn(Duration::from_millis(settings.debounce.search_ms), move |query: String| {
        let places = places.clone();
        async move {
            match places.search(&query).await {
                Ok(found) if json => {
                    if let Err(e) = print_json(&found) {
                        tracing::error!("Failed to print places: {}", e);
                    }
                }
                Ok(found) => print_places(&found),
                Err(e) => tracing::warn!("Place search failed: {}", e),
            }
        }
    });

    let relay = relay_for(&settings, false)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let action = match parse_action(&line) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match action {
            Action::Form(event) => controller.handle(event),
            Action::Pick(point) => {
                if let Err(e) = controller.select_location(point) {
                    eprintln!("{}", e);
                }
            }
            Action::Search(query) => {
                search.call(query);
            }
            Action::Show => console.quote_updated(&controller.snapshot()),
            Action::Export { phone, name } => {
                let customer = match CustomerInfo::new(&name, &phone) {
                    Ok(customer) => customer,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };
                if !controller.settle_location().await {
                    tracing::warn!("Distance for the picked location is still being measured");
                }
                let session = controller.with_session(|s| s.clone());
                let relay = relay.as_ref().map(|r| r as &dyn QuoteRelay);
                match export_quote(&session, customer, std::path::Path::new("."), relay).await {
                    Ok(outcome) => print_outcome(&outcome),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Action::Quit => break,
        }
    }

    search.close().await;
    controller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_edits() {
        assert_eq!(
            parse_action("type boundary").unwrap(),
            Some(Action::Form(FormEvent::WallType(Some("boundary".into()))))
        );
        assert_eq!(
            parse_action("length 12.5").unwrap(),
            Some(Action::Form(FormEvent::Length(Some(12.5))))
        );
        assert_eq!(
            parse_action("height -").unwrap(),
            Some(Action::Form(FormEvent::Height(None)))
        );
        assert_eq!(
            parse_action(r#"{"field":"breadth","value":8}"#).unwrap(),
            Some(Action::Form(FormEvent::Breadth(Some(8.0))))
        );
    }

    #[test]
    fn test_parse_pick_and_export() {
        assert_eq!(
            parse_action("pick 26.9 88.5").unwrap(),
            Some(Action::Pick(GeoPoint::new(26.9, 88.5)))
        );
        assert!(parse_action("pick 26.9").is_err());
        assert_eq!(
            parse_action("export 98300 Asha Roy").unwrap(),
            Some(Action::Export {
                phone: "98300".into(),
                name: "Asha Roy".into()
            })
        );
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        assert_eq!(parse_action("   ").unwrap(), None);
        assert_eq!(parse_action("# comment").unwrap(), None);
        assert!(parse_action("paint red").is_err());
        assert!(parse_action("length ten").is_err());
    }
}
