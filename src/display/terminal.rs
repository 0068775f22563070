// src/display/terminal.rs
//! Terminal-based fleet table

use super::FleetRow;
use crate::{error::Result, fleet::Vehicle};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tokio::sync::watch;

const WIDTH: usize = 110;

pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Redraw the table on every fleet snapshot until `running` is cleared
    pub async fn run(
        &self,
        mut updates: watch::Receiver<Vec<Vehicle>>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap)?;

        while running.load(Ordering::Relaxed) {
            let vehicles = updates.borrow_and_update().clone();

            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
            self.render(&mut stdout, &vehicles)?;
            stdout.flush()?;

            if updates.changed().await.is_err() {
                // simulator dropped
                break;
            }
        }

        execute!(stdout, Show, EnableLineWrap)?;
        println!("\nShutting down...");
        Ok(())
    }

    /// Render the fleet table
    pub fn render(&self, out: &mut impl Write, vehicles: &[Vehicle]) -> Result<()> {
        execute!(
            out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(WIDTH)),
            Print("\n"),
            Print("NMEA Fleet - Position and Time Details"),
            Print("\n"),
            Print("=".repeat(WIDTH)),
            Print("\n"),
            ResetColor
        )?;

        if vehicles.is_empty() {
            execute!(out, Print("No vehicles yet.\n\n"))?;
        } else {
            self.render_table(out, vehicles)?;
            self.render_raw_section(out, vehicles)?;
        }

        execute!(
            out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(WIDTH)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        )?;
        Ok(())
    }

    fn render_table(&self, out: &mut impl Write, vehicles: &[Vehicle]) -> Result<()> {
        let header = format_columns(&[
            "Vehicle", "Date", "Time (UTC)", "Latitude", "Longitude", "Altitude", "Fix",
            "Quality", "Sats", "HDOP",
        ]);
        execute!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(header),
            Print("\n"),
            ResetColor
        )?;

        for vehicle in vehicles {
            let row = FleetRow::from_vehicle(vehicle);
            let line = format_columns(&[
                row.vehicle.as_str(),
                row.date.as_str(),
                row.time.as_str(),
                row.latitude.as_str(),
                row.longitude.as_str(),
                row.altitude.as_str(),
                row.fix.as_str(),
                row.fix_quality.as_str(),
                row.satellites.as_str(),
                row.hdop.as_str(),
            ]);
            execute!(out, Print(line), Print("\n"))?;
        }

        execute!(out, Print("\n"))?;
        Ok(())
    }

    fn render_raw_section(&self, out: &mut impl Write, vehicles: &[Vehicle]) -> Result<()> {
        execute!(
            out,
            SetForegroundColor(Color::Blue),
            Print("RAW NMEA:\n"),
            ResetColor
        )?;

        for vehicle in vehicles {
            let raw = vehicle.sentences.as_ref().map_or("-", |s| s.gga.as_str());
            execute!(out, Print(format!("  {:<12} {}\n", vehicle.name, raw)))?;
        }

        execute!(out, Print("\n"))?;
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn format_columns(cells: &[&str]) -> String {
    const WIDTHS: [usize; 10] = [12, 12, 11, 11, 11, 9, 5, 8, 5, 5];
    cells
        .iter()
        .zip(WIDTHS)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}
