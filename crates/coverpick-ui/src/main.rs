#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod helpers;
mod modules;
mod theme;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> eframe::Result {
    ffmpeg_the_third::init().expect("failed to initialize FFmpeg");

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("CoverPick")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([720.0, 520.0])
            .with_resizable(true)
            .with_icon(icon()),
        ..Default::default()
    };

    eframe::run_native(
        "CoverPick",
        native_options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(app::CoverPickApp::new(cc)))
        }),
    )
}

/// Window icon, drawn in code: a filmstrip with one accent-colored frame.
fn icon() -> egui::IconData {
    const N: usize = 32;
    let mut rgba = vec![0u8; N * N * 4];
    for y in 0..N {
        for x in 0..N {
            let sprocket_row  = (3..=6).contains(&y) || (25..=28).contains(&y);
            let sprocket_hole = sprocket_row && (x / 4) % 2 == 1;
            let frame_area    = (9..=22).contains(&y) && (2..=29).contains(&x);
            let picked_frame  = frame_area && (12..=21).contains(&x);

            let (r, g, b) = if sprocket_hole {
                (70, 70, 82)
            } else if picked_frame {
                (64, 186, 200)
            } else if frame_area {
                (38, 38, 46)
            } else {
                (16, 16, 20)
            };
            let i = (y * N + x) * 4;
            rgba[i] = r;
            rgba[i + 1] = g;
            rgba[i + 2] = b;
            rgba[i + 3] = 255;
        }
    }
    egui::IconData { rgba, width: N as u32, height: N as u32 }
}
