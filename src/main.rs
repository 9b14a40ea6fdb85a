//! SK Invaders entry point
//!
//! Headless host loop: drives the formation on a fixed timestep and stands in
//! for the combat layer by knocking out random invaders with a seeded RNG.
//!
//! Usage: `sk-invaders [settings.json] [seed]`

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use sk_invaders::FormationSettings;
use sk_invaders::consts::*;
use sk_invaders::sim::{Formation, InvaderKind};

/// Rendered frame length fed to the accumulator (30 FPS)
const FRAME_DT: f64 = 1.0 / 30.0;
/// Invaders touching this line have reached the ship
const SHIP_LINE: f32 = 16.0;
/// One invader falls every this many formation moves
const MOVES_PER_KILL: u64 = 2;
/// Hard stop for the demo (simulated seconds)
const MAX_SECONDS: f64 = 600.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("SK Invaders (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => FormationSettings::load(&PathBuf::from(path))?,
        None => {
            log::warn!("No settings file given, using reference defaults");
            FormationSettings::default()
        }
    };
    let seed = match args.next() {
        Some(seed) => seed.parse::<u64>()?,
        None => 12345,
    };

    let origin = Formation::reference_origin(settings.playfield_width);
    let mut formation = Formation::reference_grid(&settings, origin)?;
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut now = 0.0;
    let mut accumulator = 0.0;
    let mut last_kill_at = 0;

    while now < MAX_SECONDS {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            now += SIM_DT;
            formation.advance(now)?;
            accumulator -= SIM_DT;
            substeps += 1;
        }

        if formation.moves() >= last_kill_at + MOVES_PER_KILL && !formation.is_cleared() {
            let index = rng.random_range(0..formation.invaders().len());
            let victim = formation.invaders()[index].clone();
            formation.destroy(victim.id);
            last_kill_at = formation.moves();
            log::info!(
                "t={:.2}s invader {:?} ({}) destroyed, {} left",
                now,
                victim.id,
                kind_label(victim.kind),
                formation.invaders().len()
            );
        }

        if formation.is_cleared() {
            log::info!(
                "Wave cleared at t={:.2}s after {} moves",
                now,
                formation.moves()
            );
            return Ok(());
        }
        if formation.has_landed(SHIP_LINE) {
            log::info!(
                "Invaders reached the ship at t={:.2}s ({} left)",
                now,
                formation.invaders().len()
            );
            return Ok(());
        }
    }

    log::info!("Demo ended at t={:.2}s, formation heading {}", now, formation.direction().as_str());
    Ok(())
}

fn kind_label(kind: InvaderKind) -> &'static str {
    match kind {
        InvaderKind::A => "A",
        InvaderKind::B => "B",
        InvaderKind::C => "C",
    }
}
