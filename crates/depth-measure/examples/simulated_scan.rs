//! Drives a full scan against synthetic depth frames: a flat surface at
//! 0.40 m with a 24 mm tall block placed on it for the object pass.

use depth_measure::core::{init_from_env, CameraIntrinsics, DepthGridView};
use depth_measure::{ScanParams, ScanPhase, ScanSession, ScanUpdate};

const W: usize = 64;
const H: usize = 48;

fn surface(depth: f32, block_height: f32) -> Vec<f32> {
    let mut data = vec![depth; W * H];
    if block_height > 0.0 {
        for y in 18..30 {
            for x in 24..40 {
                data[y * W + x] = depth - block_height;
            }
        }
    }
    data
}

fn report(updates: &[ScanUpdate]) {
    for update in updates {
        match update {
            ScanUpdate::Phase(phase) => println!("phase: {phase:?}"),
            ScanUpdate::Guidance(guidance) => println!("guidance: {guidance:?}"),
            ScanUpdate::Illumination { on } => println!("illumination: {}", if *on { "on" } else { "off" }),
            ScanUpdate::Measurement(result) => println!(
                "measured: {:.1} cm2, max {:.1} mm, mean {:.1} mm ({} px)",
                result.area_cm2, result.max_height_mm, result.mean_height_mm, result.pixel_count
            ),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env()?;

    let params = ScanParams::default();
    let frames = params.frames_per_window;
    let mut session = ScanSession::new(params)?;

    let intrinsics = CameraIntrinsics::new(500.0, 500.0, 640, 480).scaled_to(W, H);
    let empty = surface(0.40, 0.0);
    let with_block = surface(0.40, 0.024);

    let grid = DepthGridView::new(W, H, &empty);
    report(&session.process_frame(&grid, &intrinsics, true));

    report(&session.set_baseline());
    for _ in 0..frames {
        report(&session.process_frame(&DepthGridView::new(W, H, &empty), &intrinsics, true));
    }

    report(&session.scan_object());
    for _ in 0..frames {
        report(&session.process_frame(&DepthGridView::new(W, H, &with_block), &intrinsics, true));
    }

    assert_eq!(session.phase(), ScanPhase::Completed);
    Ok(())
}
