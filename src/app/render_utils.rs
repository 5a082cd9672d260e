use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use lexgraph::{EntityType, RiskLevel};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| ((a as f32 * (1.0 - amount)) + (b as f32 * amount)) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

/// Darkens and partially fades a color for de-emphasised nodes.
pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Fills the canvas and draws a grid that follows pan and zoom. `origin` is
/// the screen position of the simulation-space origin.
pub(super) fn draw_background(painter: &Painter, rect: Rect, origin: Pos2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(22, 24, 31));

    let step = (64.0 * zoom).clamp(18.0, 160.0);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(64, 70, 86, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

/// Conservative: a segment whose bounding box misses the canvas is culled.
pub(super) fn segment_maybe_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    rect.intersects(Rect::from_two_pos(start, end))
}

pub(super) fn entity_color(kind: EntityType) -> Color32 {
    match kind {
        EntityType::Person => Color32::from_rgb(96, 165, 250),
        EntityType::Organization => Color32::from_rgb(52, 211, 153),
        EntityType::Case => Color32::from_rgb(251, 191, 36),
        EntityType::Document => Color32::from_rgb(167, 139, 250),
        EntityType::Event => Color32::from_rgb(244, 114, 182),
        EntityType::LegalConcept => Color32::from_rgb(45, 212, 191),
        EntityType::Court => Color32::from_rgb(248, 113, 113),
        EntityType::Location => Color32::from_rgb(163, 230, 53),
        EntityType::Unknown => Color32::from_gray(150),
    }
}

pub(super) fn risk_color(level: RiskLevel) -> Color32 {
    match level {
        RiskLevel::Low => Color32::from_rgb(74, 222, 128),
        RiskLevel::Medium => Color32::from_rgb(250, 204, 21),
        RiskLevel::High => Color32::from_rgb(251, 146, 60),
        RiskLevel::Critical => Color32::from_rgb(239, 68, 68),
    }
}

/// Radius grows with the square root of degree so hubs stand out without
/// swallowing their neighbours.
pub(super) fn node_radius(centrality: usize, zoom: f32) -> f32 {
    let base = 6.0 + (centrality as f32).sqrt() * 2.4;
    (base * zoom.powf(0.4)).clamp(3.0, 36.0)
}

/// Screen-space offset of the simulation canvas when it is centred in `rect`.
pub(super) fn canvas_origin(rect: Rect, canvas: Vec2) -> Pos2 {
    rect.center() - canvas * 0.5
}
