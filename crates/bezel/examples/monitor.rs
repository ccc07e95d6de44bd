//! Monitor — the detailed model with the control panel.
//!
//! Keys: arrows / PgUp / PgDn move, W/S A/D Z/X rotate, -/= scale,
//! Space starts or stops the animation, 1/2/3 pick spin/bounce/pulse,
//! F wireframe, R reset, F5 save view, F9 load view, F12 panel.
//!
//! Run with the `diagnostics` feature and `cargo run -p bezel-telemetry`
//! in another terminal to watch it live.

use bezel::prelude::*;

fn main() {
    #[cfg(feature = "diagnostics")]
    bezel::diag::init_logger();
    #[cfg(not(feature = "diagnostics"))]
    env_logger::init();

    let result = Viewer::new("bezel — monitor")
        .model(ModelVariant::Detailed)
        .parameters(TransformParameters {
            rotation: Vec3::new(10.0, -25.0, 0.0),
            ..TransformParameters::default()
        })
        .animation(AnimationPreset::Spin)
        .run();

    if let Err(e) = result {
        eprintln!("monitor: {e}");
        std::process::exit(1);
    }
}
