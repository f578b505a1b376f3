//! Ring Bounce headless host
//!
//! Plays the part of the renderer: owns a 60 Hz frame clock, calls the
//! simulation once per frame and prints ball pixel positions as JSON lines.
//!
//! Usage: `ring-bounce [settings.json]` or `ring-bounce --dump-settings [preset]`

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use ring_bounce::sim::Driver;
    use ring_bounce::{Preset, Settings, Viewport};

    /// Frames simulated per run (10 s at 60 Hz)
    const FRAMES: u32 = 600;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frame pacing noise (ms)
    const JITTER_MS: f64 = 2.0;
    /// One simulated stall halfway through, to exercise the dt clamp
    const STALL_MS: f64 = 5000.0;
    const JITTER_SEED: u64 = 0x5eed;

    const CANVAS_WIDTH: f64 = 800.0;
    const CANVAS_HEIGHT: f64 = 600.0;

    #[derive(Serialize)]
    struct FrameTrace {
        frame: u32,
        dt: f64,
        bounces: u32,
        /// Pixel positions in ball order
        balls: Vec<[f64; 2]>,
    }

    fn dump_settings(preset: Option<&str>) -> i32 {
        let preset = match preset.map(Preset::from_str) {
            None => Preset::default(),
            Some(Some(preset)) => preset,
            Some(None) => {
                eprintln!("Unknown preset (expected reference, stable or accurate)");
                return 2;
            }
        };
        match Settings::from_preset(preset).to_json() {
            Ok(json) => {
                println!("{json}");
                0
            }
            Err(e) => {
                eprintln!("{e}");
                1
            }
        }
    }

    pub fn run() -> i32 {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.first().map(String::as_str) == Some("--dump-settings") {
            return dump_settings(args.get(1).map(String::as_str));
        }

        let settings = match args.first() {
            Some(path) => match Settings::load(path) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Invalid settings: {e}");
                    return 1;
                }
            },
            None => Settings::default(),
        };

        let mut driver = Driver::from_settings(&settings);
        let viewport = Viewport::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let mut rng = Pcg32::seed_from_u64(JITTER_SEED);
        log::info!(
            "Simulating {} ball(s) for {} frames ({:?}, {:?})",
            driver.world.balls.len(),
            FRAMES,
            settings.physics.bounce,
            settings.physics.collision
        );

        let mut now = 0.0;
        let mut total_bounces = 0u64;
        for frame in 0..FRAMES {
            now += FRAME_MS + rng.random_range(-JITTER_MS..JITTER_MS);
            if frame == FRAMES / 2 {
                log::info!("Simulating a {STALL_MS} ms stall");
                now += STALL_MS;
            }

            let report = driver.frame(now);
            total_bounces += u64::from(report.stats.bounces);

            let trace = FrameTrace {
                frame,
                dt: report.dt,
                bounces: report.stats.bounces,
                balls: driver
                    .world
                    .balls
                    .iter()
                    .map(|ball| viewport.to_pixel(ball.pos).to_array())
                    .collect(),
            };
            match serde_json::to_string(&trace) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    log::error!("Failed to encode frame {frame}: {e}");
                    return 1;
                }
            }
        }

        log::info!(
            "Done: {} ticks, {:.2}s simulated, {} bounces, max distance {:.6}",
            driver.world.time_ticks,
            driver.world.elapsed,
            total_bounces,
            driver.world.max_distance()
        );
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ring Bounce (headless) starting...");
    std::process::exit(host::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless host on wasm; embed the library in a browser renderer instead
}
