use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quote_core::distance::GeoPoint;

#[derive(Parser, Debug)]
#[command(name = "wallquote", version, about = "Wall construction quote calculator")]
pub struct Cli {
    #[arg(long, global = true, help = "Settings file (JSON); built-in defaults when omitted")]
    pub settings: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a wall
    Quote {
        #[command(flatten)]
        wall: WallArgs,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Delivery distance from the factory to a point
    Distance {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, default_value_t = false, help = "Aerial distance only, no routing service")]
        offline: bool,
    },
    /// Search for a delivery location by name
    Search { query: String },
    /// Write a PDF quotation and forward the request
    Export {
        #[command(flatten)]
        wall: WallArgs,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long, default_value_t = false, help = "Do not forward the request")]
        no_relay: bool,
        #[arg(long, help = "Also save the quote record as JSON")]
        save_record: Option<PathBuf>,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Line-driven quote form on stdin
    Interactive {
        #[arg(long, default_value_t = false, help = "Aerial distance only, no routing service")]
        offline: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Write the default settings to a file
    Init {
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the effective settings
    Show,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WallArgs {
    #[arg(long, help = "boundary, exterior or partition")]
    pub wall_type: Option<String>,
    #[arg(long, help = "Plot length (ft)")]
    pub length: Option<f64>,
    #[arg(long, help = "Plot breadth (ft)")]
    pub breadth: Option<f64>,
    #[arg(long, help = "Wall height (ft)")]
    pub height: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    pub lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lng: Option<f64>,
    #[arg(long, conflicts_with_all = ["lat", "lng"], help = "Known delivery distance (km)")]
    pub distance_km: Option<f64>,
    #[arg(long, default_value_t = false, help = "Aerial distance only, no routing service")]
    pub offline: bool,
}

impl LocationArgs {
    pub fn point(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}
