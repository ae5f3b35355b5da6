#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for McBean.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Enable this crate's `audio` feature to opt back in.

mod audio;
mod manifest;
mod sprites;
mod text;

use std::{collections::VecDeque, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    math::Vec2 as MacroquadVec2,
    shapes,
};
use mcbean_core::TICKS_PER_SECOND;
use mcbean_rendering::{
    visuals::ellipse_points, AudioCapability, FixedTimestep, FrameControl, FrameInput,
    FrameOutput, KeyInput, Presentation, RenderingBackend, Scene, Shape, SpriteKey,
};

use self::{audio::SoundBoard, sprites::SpriteAtlas, text::Fonts};

pub use manifest::{AssetManifest, AudioSources, FontSources, ManifestError, SpriteSource};

const ELLIPSE_SEGMENTS: u32 = 48;

struct KeyboardShortcuts {
    /// `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Up` or `W`.
    up: bool,
    /// `Down` or `S`.
    down: bool,
    /// `Enter`, keypad `Enter` or `Space`.
    confirm: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            up: is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W),
            down: is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S),
            confirm: is_key_pressed(KeyCode::Enter)
                || is_key_pressed(KeyCode::KpEnter)
                || is_key_pressed(KeyCode::Space),
        }
    }

    fn keys(&self) -> Vec<KeyInput> {
        let mut keys = Vec::new();
        if self.up {
            keys.push(KeyInput::Up);
        }
        if self.down {
            keys.push(KeyInput::Down);
        }
        if self.confirm {
            keys.push(KeyInput::Confirm);
        }
        keys
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    ticks_per_second: u32,
    fonts: FontSources,
    audio: AudioSources,
    audio_capability: AudioCapability,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            ticks_per_second: TICKS_PER_SECOND,
            fonts: FontSources::default(),
            audio: AudioSources {
                music: None,
                shot: None,
                round_complete: None,
                music_volume: 0.0,
            },
            audio_capability: AudioCapability::Disabled,
        }
    }
}

impl MacroquadBackend {
    /// Returns a silent backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the fixed simulation rate handed to the update closure.
    #[must_use]
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    /// Configures the font faces loaded at startup.
    #[must_use]
    pub fn with_fonts(mut self, fonts: FontSources) -> Self {
        self.fonts = fonts;
        self
    }

    /// Configures the clips loaded at startup and whether sound is played at all.
    #[must_use]
    pub fn with_audio(mut self, audio: AudioSources, capability: AudioCapability) -> Self {
        self.audio = audio;
        self.audio_capability = capability;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutput + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            ticks_per_second,
            fonts,
            audio,
            audio_capability,
        } = self;

        let Presentation {
            window_title,
            window_size,
            sprites,
            scene,
        } = presentation;

        let mut timestep =
            FixedTimestep::new(ticks_per_second).context("invalid simulation tick rate")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x as i32,
            window_height: window_size.y as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = match SpriteAtlas::from_sheet(&sprites) {
                Ok(atlas) => atlas,
                Err(error) => {
                    let _ = init_sender.send(Err(error));
                    return;
                }
            };
            for key in SpriteKey::ALL {
                if !sprite_atlas.contains(key) {
                    tracing::warn!(?key, "sprite missing from sheet; it will not be drawn");
                }
            }
            let fonts = Fonts::load(&fonts).await;
            let mut sound_board = SoundBoard::load(&audio, audio_capability).await;
            if sound_board.capability().is_enabled() {
                sound_board.start_music();
            }
            let _ = init_sender.send(Ok(()));

            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let frame_input = FrameInput {
                    ticks: timestep.advance(frame_dt),
                    clicks: gather_clicks(),
                    keys: keyboard.keys(),
                    quit_requested: keyboard.quit_requested,
                };

                let FrameOutput { cues, control } =
                    update_scene(frame_dt, frame_input, &mut scene);
                sound_board.handle(&cues);
                sound_board.update(frame_dt);

                draw_scene(&scene, &sprite_atlas, &fonts);

                let fps_metrics = fps_counter.record_frame(frame_dt);
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                    }) = fps_metrics
                    {
                        tracing::info!(
                            fps = format_args!("{per_second:.2}"),
                            trailing_10s = format_args!("{trailing_ten_seconds:.2}"),
                            "frame rate"
                        );
                    }
                }

                if control == FrameControl::Exit {
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn gather_clicks() -> Vec<Vec2> {
    if is_mouse_button_pressed(MouseButton::Left) {
        let (x, y) = mouse_position();
        vec![Vec2::new(x, y)]
    } else {
        Vec::new()
    }
}

fn draw_scene(scene: &Scene, sprite_atlas: &SpriteAtlas, fonts: &Fonts) {
    macroquad::window::clear_background(to_macroquad_color(scene.clear_color));

    if let Some(backdrop) = scene.backdrop {
        sprite_atlas.draw_top_left(backdrop, Vec2::ZERO);
    }
    for shape in &scene.shapes {
        draw_shape(shape);
    }
    for sprite in &scene.sprites {
        sprite_atlas.draw_centered(sprite.key, sprite.center);
    }
    for label in &scene.labels {
        fonts.draw(label);
    }
}

fn draw_shape(shape: &Shape) {
    match *shape {
        Shape::Ellipse {
            center,
            radii,
            fill,
            outline,
        } => {
            let points = ellipse_points(center, radii, ELLIPSE_SEGMENTS);
            let fill = to_macroquad_color(fill);
            let hub = to_macroquad_vec2(center);
            for (start, end) in ring_segments(&points) {
                shapes::draw_triangle(hub, to_macroquad_vec2(start), to_macroquad_vec2(end), fill);
            }
            if let Some(stroke) = outline {
                let color = to_macroquad_color(stroke.color);
                for (start, end) in ring_segments(&points) {
                    shapes::draw_line(start.x, start.y, end.x, end.y, stroke.thickness, color);
                }
            }
        }
        Shape::Circle {
            center,
            radius,
            color,
        } => shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(color)),
        Shape::Rect {
            top_left,
            size,
            color,
        } => shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        ),
    }
}

/// Consecutive point pairs around a closed outline, wrapping back to the first point.
fn ring_segments(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(start, end)| (*start, *end))
}

fn to_macroquad_vec2(point: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(point.x, point.y)
}

fn to_macroquad_color(color: mcbean_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_map_to_keys_in_fixed_order() {
        let keyboard = KeyboardShortcuts {
            quit_requested: false,
            up: true,
            down: true,
            confirm: true,
        };
        assert_eq!(
            keyboard.keys(),
            vec![KeyInput::Up, KeyInput::Down, KeyInput::Confirm]
        );

        let idle = KeyboardShortcuts {
            quit_requested: true,
            up: false,
            down: false,
            confirm: false,
        };
        assert!(idle.keys().is_empty());
    }

    #[test]
    fn ring_segments_close_the_outline() {
        let points = [Vec2::ZERO, Vec2::X, Vec2::Y];
        let segments: Vec<_> = ring_segments(&points).collect();
        assert_eq!(
            segments,
            vec![
                (Vec2::ZERO, Vec2::X),
                (Vec2::X, Vec2::Y),
                (Vec2::Y, Vec2::ZERO),
            ]
        );
    }

    #[test]
    fn default_backend_is_silent() {
        let backend = MacroquadBackend::new();
        assert_eq!(backend.audio_capability, AudioCapability::Disabled);
        assert_eq!(backend.ticks_per_second, TICKS_PER_SECOND);

        let vsync_off = MacroquadBackend::new().with_vsync(false);
        assert_eq!(vsync_off.swap_interval, Some(0));
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());

        let metrics = counter
            .record_frame(frame)
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame).is_none());
    }

    #[test]
    fn fps_counter_tracks_trailing_ten_second_average() {
        let mut counter = FpsCounter::default();

        for _ in 0..10 {
            for sample in 0..5 {
                let metrics = counter.record_frame(Duration::from_millis(200));
                if sample == 4 {
                    let metrics = metrics.expect("should report every second");
                    assert!((metrics.per_second - 5.0).abs() <= 1e-3);
                    assert!((metrics.trailing_ten_seconds - 5.0).abs() <= 1e-3);
                } else {
                    assert!(metrics.is_none());
                }
            }
        }

        for sample in 0..10 {
            let metrics = counter.record_frame(Duration::from_millis(100));
            if sample == 9 {
                let metrics = metrics.expect("should report every second");
                assert!((metrics.per_second - 10.0).abs() <= 1e-3);
                assert!((metrics.trailing_ten_seconds - 5.5).abs() <= 1e-3);
            } else {
                assert!(metrics.is_none());
            }
        }
    }
}
