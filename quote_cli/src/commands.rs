use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use quote_core::calculations::{evaluate, QuoteResult};
use quote_core::display::{format_inr, format_km, QuoteDisplay};
use quote_core::distance::{DistanceMeasurement, DistanceResolver, GeoPoint};
use quote_core::export::{export_quote, CustomerInfo, ExportOutcome, QuoteRelay, RelayStatus, Web3FormsRelay};
use quote_core::file_io::{load_settings, save_record, save_settings};
use quote_core::geocoding::{NominatimSearch, PlaceMatch, PlaceSearch};
use quote_core::session::{FormEvent, QuoteSession};
use quote_core::settings::QuoteSettings;

use crate::cli::{LocationArgs, WallArgs};

/// Built-in defaults, or the given file, then environment overrides
pub fn load_effective_settings(path: Option<&Path>) -> Result<QuoteSettings> {
    let settings = match path {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => QuoteSettings::default(),
    };
    Ok(settings.apply_env())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn resolver(settings: &QuoteSettings, offline: bool) -> Result<DistanceResolver> {
    if offline {
        return Ok(DistanceResolver::offline(settings.reference_point));
    }
    Ok(DistanceResolver::osrm(settings.reference_point, &settings.routing)?)
}

fn fill_form(session: &mut QuoteSession, wall: &WallArgs) {
    session.apply(FormEvent::WallType(wall.wall_type.clone()));
    session.apply(FormEvent::Length(wall.length));
    session.apply(FormEvent::Breadth(wall.breadth));
    session.apply(FormEvent::Height(wall.height));
}

/// Pick the location (if any) and apply its measured distance
async fn locate(session: &mut QuoteSession, location: &LocationArgs) -> Result<()> {
    let Some(point) = location.point() else {
        return Ok(());
    };
    point.validate()?;
    let resolver = resolver(session.settings(), location.offline)?;
    let ticket = session.begin_lookup(point);
    let measurement = resolver.measure(point).await;
    session.apply_lookup(&ticket, measurement);
    Ok(())
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    display: QuoteDisplay,
    result: Option<QuoteResult>,
    distance: Option<DistanceMeasurement>,
}

pub async fn quote(settings: QuoteSettings, json: bool, wall: &WallArgs, location: &LocationArgs) -> Result<()> {
    let mut session = QuoteSession::new(settings);
    fill_form(&mut session, wall);
    locate(&mut session, location).await?;

    let result = match location.distance_km {
        Some(km) => {
            let s = session.settings();
            evaluate(session.form(), km, &s.price_table, &s.shipping)
        }
        None => session.current_quote(),
    };
    let report = QuoteReport {
        display: QuoteDisplay::from_outcome(result.as_ref()),
        result,
        distance: session.distance().copied(),
    };

    if json {
        return print_json(&report);
    }
    if let Some(m) = &report.distance {
        println!("Delivery distance: {} km ({})", format_km(m.km), m.method.display_name());
    }
    print!("{}", report.display);
    Ok(())
}

pub async fn distance(settings: QuoteSettings, json: bool, point: GeoPoint, offline: bool) -> Result<()> {
    point.validate()?;
    let measurement = resolver(&settings, offline)?.measure(point).await;
    if json {
        return print_json(&measurement);
    }
    println!(
        "{} km ({}) from {}",
        format_km(measurement.km),
        measurement.method.display_name(),
        settings.reference_point
    );
    Ok(())
}

pub fn print_places(places: &[PlaceMatch]) {
    if places.is_empty() {
        println!("No places found");
        return;
    }
    for (i, place) in places.iter().enumerate() {
        println!("{}. {} - {} [{}]", i + 1, place.title, place.description, place.kind);
        println!("   {}", place.point);
    }
}

pub async fn search(settings: QuoteSettings, json: bool, query: &str) -> Result<()> {
    let places = NominatimSearch::new(&settings.geocoding)?.search(query).await?;
    if json {
        return print_json(&places);
    }
    print_places(&places);
    Ok(())
}

/// Relay configured in settings, unless disabled
pub fn relay_for(settings: &QuoteSettings, disabled: bool) -> Result<Option<Web3FormsRelay>> {
    if disabled {
        return Ok(None);
    }
    let relay = Web3FormsRelay::from_settings(&settings.relay)?;
    if relay.is_none() {
        tracing::warn!("No relay access key configured; the quote request will not be forwarded");
    }
    Ok(relay)
}

pub fn print_outcome(outcome: &ExportOutcome) {
    println!("Quotation {} written to {}", outcome.record.reference, outcome.pdf_path.display());
    let result = &outcome.record.result;
    println!(
        "Total: {} (shipping {} for {} km)",
        format_inr(result.total),
        format_inr(result.surcharge),
        format_km(result.distance_km)
    );
    match &outcome.relay {
        RelayStatus::Delivered => println!("Quote request sent"),
        RelayStatus::Failed(reason) => println!("Quote request not sent: {}", reason),
        RelayStatus::Skipped => println!("Quote request not sent (no relay configured)"),
    }
}

pub struct ExportArgs<'a> {
    pub wall: &'a WallArgs,
    pub location: &'a LocationArgs,
    pub name: &'a str,
    pub phone: &'a str,
    pub out: &'a Path,
    pub no_relay: bool,
    pub save_record: Option<&'a Path>,
}

pub async fn export(settings: QuoteSettings, json: bool, args: ExportArgs<'_>) -> Result<()> {
    let customer = CustomerInfo::new(args.name, args.phone)?;
    let relay = relay_for(&settings, args.no_relay)?;

    let mut session = QuoteSession::new(settings);
    fill_form(&mut session, args.wall);
    locate(&mut session, args.location).await?;

    let outcome = export_quote(
        &session,
        customer,
        args.out,
        relay.as_ref().map(|r| r as &dyn QuoteRelay),
    )
    .await?;

    if let Some(path) = args.save_record {
        save_record(&outcome.record, path)?;
    }

    if json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    Ok(())
}

pub fn settings_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_settings(&QuoteSettings::default(), path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

/// Effective settings, with the relay key masked
pub fn settings_show(mut settings: QuoteSettings, json: bool) -> Result<()> {
    if settings.relay.access_key.is_some() {
        settings.relay.access_key = Some("********".to_string());
    }
    if json {
        return print_json(&settings);
    }
    println!("Company:   {}", settings.company.name);
    println!("Factory:   {}", settings.reference_point);
    for wall_type in settings.price_table.wall_types() {
        let rate = settings.price_table.rate_for(wall_type)?;
        println!("Rate:      {} Rs.{}/sq.ft", wall_type.display_name(), rate);
    }
    println!(
        "Shipping:  free up to {} km, then Rs.{}/sq.ft/km",
        settings.shipping.free_radius_km, settings.shipping.rate_per_km_per_sqft
    );
    println!("Routing:   {}", settings.routing.base_url);
    println!("Geocoding: {}", settings.geocoding.base_url);
    println!(
        "Relay:     {} ({})",
        settings.relay.endpoint,
        if settings.relay.access_key.is_some() { "configured" } else { "no access key" }
    );
    Ok(())
}
