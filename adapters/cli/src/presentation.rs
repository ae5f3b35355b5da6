//! Translates world state into the scene drawn by the rendering backend.

use glam::Vec2;
use mcbean_core::{GamePhase, MenuOption, GAME_TITLE, ROUND_SIZE, TARGET_HEIGHT, TARGET_WIDTH};
use mcbean_rendering::{
    visuals, Color, FontRole, Scene, Shape, SpriteInstance, SpriteKey, Stroke, TextLabel,
};
use mcbean_world::{query, Pose, Target, World};

const DISC_COLOR: Color = Color::from_rgb_u8(200, 200, 200);
const DISC_OUTLINE: Stroke = Stroke {
    thickness: 2.0,
    color: Color::BLACK,
};
const RESTART_HIGHLIGHT: Color = Color::from_rgb_u8(100, 255, 100);
const QUIT_HIGHLIGHT: Color = Color::from_rgb_u8(255, 100, 100);
const HINT_COLOR: Color = Color::from_rgb_u8(180, 180, 180);

const TITLE_POSITION: Vec2 = Vec2::new(400.0, 100.0);
const SCORE_POSITION: Vec2 = Vec2::new(20.0, 20.0);
const ROUND_POSITION: Vec2 = Vec2::new(20.0, 60.0);
const BULLETS_POSITION: Vec2 = Vec2::new(650.0, 550.0);

/// Rebuilds `scene` from scratch for the current phase.
pub(crate) fn compose(world: &World, scene: &mut Scene) {
    scene.clear_color = Color::BLACK;
    scene.backdrop = None;
    scene.shapes.clear();
    scene.sprites.clear();
    scene.labels.clear();

    match query::phase(world) {
        GamePhase::Intro => compose_intro(world, scene),
        GamePhase::Walk => compose_walk(world, scene),
        GamePhase::Gameplay => compose_gameplay(world, scene),
        GamePhase::GameOver => compose_game_over(world, scene),
    }
}

fn compose_intro(world: &World, scene: &mut Scene) {
    scene.backdrop = Some(SpriteKey::Backdrop);
    scene.sprites.push(SpriteInstance::new(
        SpriteKey::PlayerIdle,
        query::player(world).position(),
    ));
    scene.labels.push(TextLabel::centered(
        GAME_TITLE,
        TITLE_POSITION,
        FontRole::Title,
        Color::BLACK,
    ));
}

fn compose_walk(world: &World, scene: &mut Scene) {
    scene.backdrop = Some(SpriteKey::Backdrop);
    if let Some(tumbleweed) = query::tumbleweed(world) {
        scene.shapes.extend(visuals::tumbleweed_shapes(
            tumbleweed.position(),
            tumbleweed.rotation_degrees(),
        ));
    }
    scene.sprites.push(SpriteInstance::new(
        SpriteKey::PlayerIdle,
        query::player(world).position(),
    ));
}

fn compose_gameplay(world: &World, scene: &mut Scene) {
    scene.backdrop = Some(SpriteKey::Backdrop);
    for target in query::targets(world) {
        push_target(target, &mut scene.shapes);
    }

    let player = query::player(world);
    let key = match player.pose() {
        Pose::Idle => SpriteKey::PlayerIdle,
        Pose::Shooting => SpriteKey::PlayerShooting,
    };
    scene
        .sprites
        .push(SpriteInstance::new(key, player.position()));

    let hud = [
        (
            format!("Bullets: {}", query::bullets(world)),
            BULLETS_POSITION,
        ),
        (format!("Score: {}", query::score(world)), SCORE_POSITION),
        (
            format!(
                "Round: {}/{}",
                query::round(world),
                query::total_rounds(world)
            ),
            ROUND_POSITION,
        ),
    ];
    for (text, position) in hud {
        scene.labels.push(TextLabel::top_left(
            text,
            position,
            FontRole::Body,
            Color::BLACK,
        ));
    }
}

fn push_target(target: &Target, shapes: &mut Vec<Shape>) {
    if target.is_intact() {
        shapes.push(Shape::Ellipse {
            center: target.position(),
            radii: Vec2::new(TARGET_WIDTH / 2.0, TARGET_HEIGHT / 2.0),
            fill: DISC_COLOR,
            outline: Some(DISC_OUTLINE),
        });
        return;
    }
    shapes.extend(target.debris().iter().map(|debris| Shape::Circle {
        center: debris.position,
        radius: debris.radius,
        color: DISC_COLOR,
    }));
}

fn compose_game_over(world: &World, scene: &mut Scene) {
    let possible = ROUND_SIZE * query::total_rounds(world);
    scene.labels.push(TextLabel::centered(
        "GAME OVER!",
        TITLE_POSITION,
        FontRole::Title,
        Color::WHITE,
    ));
    scene.labels.push(TextLabel::centered(
        format!("FINAL SCORE: {}/{}", query::score(world), possible),
        Vec2::new(400.0, 200.0),
        FontRole::Title,
        Color::WHITE,
    ));

    if let Some(result) = query::round_results(world).first() {
        scene.labels.push(TextLabel::centered(
            format!("HIT RATIO: {}/{}", result.hits, result.shots),
            Vec2::new(400.0, 280.0),
            FontRole::Body,
            Color::WHITE,
        ));
    }

    let selection = query::menu_selection(world);
    for (option, label, highlight, y) in [
        (MenuOption::Restart, "RESTART", RESTART_HIGHLIGHT, 360.0),
        (MenuOption::Quit, "QUIT", QUIT_HIGHLIGHT, 410.0),
    ] {
        let (marker, color) = if option == selection {
            ("> ", highlight)
        } else {
            ("  ", Color::WHITE)
        };
        scene.labels.push(TextLabel::centered(
            format!("{marker}{label}"),
            Vec2::new(400.0, y),
            FontRole::Body,
            color,
        ));
    }

    scene.labels.push(TextLabel::centered(
        "Use Up/Down to select, Enter/Space to confirm",
        Vec2::new(400.0, 480.0),
        FontRole::Body,
        HINT_COLOR,
    ));
}
