//! Retained-mode scene: elements, visual state, and selectors.
//!
//! Motion components mutate [`VisualState`] directly every frame; there
//! is no diffing layer. Lookups that miss return `None` and writes to
//! missing elements are no-ops, so a page with absent elements keeps
//! working.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vitrine_common::{VitrineError, VitrineResult};

use crate::geometry::{Point2D, Rect, ViewportSize};

/// Index of an element within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// An animatable property of [`VisualState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    /// Horizontal translation in pixels.
    X,
    /// Vertical translation in pixels.
    Y,
    /// Horizontal translation as a percentage of the element's width.
    XPercent,
    /// Vertical translation as a percentage of the element's height.
    YPercent,
    Scale,
    ScaleX,
    ScaleY,
    /// Gaussian blur radius in pixels.
    Blur,
    ClipTop,
    ClipRight,
    ClipBottom,
    ClipLeft,
}

/// Clip-path inset, each edge as a percentage of the element box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipInset {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Everything the motion engine writes to an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualState {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub x_percent: f64,
    pub y_percent: f64,
    pub scale: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub blur: f64,
    pub clip: ClipInset,
    /// Transient accent (the cursor ring's section-change flash).
    pub highlight: bool,
}

impl VisualState {
    /// Fully visible, untransformed.
    pub const IDENTITY: VisualState = VisualState {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        x_percent: 0.0,
        y_percent: 0.0,
        scale: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
        blur: 0.0,
        clip: ClipInset {
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            left: 0.0,
        },
        highlight: false,
    };

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::Opacity => self.opacity,
            Property::X => self.x,
            Property::Y => self.y,
            Property::XPercent => self.x_percent,
            Property::YPercent => self.y_percent,
            Property::Scale => self.scale,
            Property::ScaleX => self.scale_x,
            Property::ScaleY => self.scale_y,
            Property::Blur => self.blur,
            Property::ClipTop => self.clip.top,
            Property::ClipRight => self.clip.right,
            Property::ClipBottom => self.clip.bottom,
            Property::ClipLeft => self.clip.left,
        }
    }

    /// Set a property. Non-finite values are ignored.
    pub fn set(&mut self, property: Property, value: f64) {
        if !value.is_finite() {
            return;
        }
        let slot = match property {
            Property::Opacity => &mut self.opacity,
            Property::X => &mut self.x,
            Property::Y => &mut self.y,
            Property::XPercent => &mut self.x_percent,
            Property::YPercent => &mut self.y_percent,
            Property::Scale => &mut self.scale,
            Property::ScaleX => &mut self.scale_x,
            Property::ScaleY => &mut self.scale_y,
            Property::Blur => &mut self.blur,
            Property::ClipTop => &mut self.clip.top,
            Property::ClipRight => &mut self.clip.right,
            Property::ClipBottom => &mut self.clip.bottom,
            Property::ClipLeft => &mut self.clip.left,
        };
        *slot = value;
    }

    /// Pixel translation for an element box of the given size.
    pub fn translation(&self, rect: &Rect) -> (f64, f64) {
        (
            self.x + self.x_percent / 100.0 * rect.w,
            self.y + self.y_percent / 100.0 * rect.h,
        )
    }

    /// Combined (horizontal, vertical) scale.
    pub fn effective_scale(&self) -> (f64, f64) {
        (self.scale * self.scale_x, self.scale * self.scale_y)
    }

    /// CSS-style transform string for an element box.
    pub fn css_transform(&self, rect: &Rect) -> String {
        let (tx, ty) = self.translation(rect);
        let (sx, sy) = self.effective_scale();
        if (sx - sy).abs() < 1e-9 {
            format!("translate3d({tx:.2}px, {ty:.2}px, 0) scale({sx:.4})")
        } else {
            format!("translate3d({tx:.2}px, {ty:.2}px, 0) scale({sx:.4}, {sy:.4})")
        }
    }

    /// Component-wise comparison with tolerance.
    pub fn approx_eq(&self, other: &VisualState, eps: f64) -> bool {
        const ALL: [Property; 13] = [
            Property::Opacity,
            Property::X,
            Property::Y,
            Property::XPercent,
            Property::YPercent,
            Property::Scale,
            Property::ScaleX,
            Property::ScaleY,
            Property::Blur,
            Property::ClipTop,
            Property::ClipRight,
            Property::ClipBottom,
            Property::ClipLeft,
        ];
        self.highlight == other.highlight
            && ALL
                .iter()
                .all(|p| (self.get(*p) - other.get(*p)).abs() <= eps)
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique name (the DOM id or ref name).
    pub name: String,

    /// Tag name, lowercase (`section`, `a`, `button`, `div`, ...).
    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default)]
    pub classes: Vec<String>,

    /// Marked `data-cursor="magnetic"`.
    #[serde(default)]
    pub magnetic: bool,

    /// Document-space layout box.
    pub rect: Rect,

    /// Name of the enclosing element. It must appear earlier in the
    /// layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Current visual state. In layout files this is the initial style.
    #[serde(default, rename = "initial")]
    pub visual: VisualState,

    /// Extra vertical offset applied while the element is pinned.
    /// Descendants move with it.
    #[serde(skip)]
    pub pin_offset: f64,
}

fn default_tag() -> String {
    "div".to_string()
}

impl Element {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            classes: Vec::new(),
            magnetic: false,
            rect,
            parent: None,
            visual: VisualState::IDENTITY,
            pin_offset: 0.0,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn magnetic(mut self) -> Self {
        self.magnetic = true;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_visual(mut self, visual: VisualState) -> Self {
        self.visual = visual;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Element query, a small subset of CSS selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#name`
    Name(String),
    /// `.class`
    Class(String),
    /// `tag`
    Tag(String),
    /// `[data-cursor="magnetic"]`
    Magnetic,
    /// `a, b, c`
    Any(Vec<Selector>),
}

impl Selector {
    /// Elements the pointer follower reacts to.
    pub fn interactive() -> Self {
        Selector::Any(vec![
            Selector::Tag("a".into()),
            Selector::Tag("button".into()),
            Selector::Magnetic,
            Selector::Tag("input".into()),
            Selector::Tag("textarea".into()),
        ])
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Name(name) => element.name == *name,
            Selector::Class(class) => element.has_class(class),
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Selector::Magnetic => element.magnetic,
            Selector::Any(list) => list.iter().any(|s| s.matches(element)),
        }
    }
}

impl FromStr for Selector {
    type Err = VitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() > 1 {
            return parts
                .into_iter()
                .map(Selector::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map(Selector::Any);
        }

        let s = parts[0];
        if s.is_empty() {
            return Err(VitrineError::scene("empty selector"));
        }
        if let Some(name) = s.strip_prefix('#') {
            return Ok(Selector::Name(name.to_string()));
        }
        if let Some(class) = s.strip_prefix('.') {
            return Ok(Selector::Class(class.to_string()));
        }
        if s.replace('\'', "\"") == "[data-cursor=\"magnetic\"]" {
            return Ok(Selector::Magnetic);
        }
        if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Ok(Selector::Tag(s.to_ascii_lowercase()));
        }
        Err(VitrineError::scene(format!("unsupported selector: {s}")))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(n) => write!(f, "#{n}"),
            Selector::Class(c) => write!(f, ".{c}"),
            Selector::Tag(t) => write!(f, "{t}"),
            Selector::Magnetic => write!(f, "[data-cursor=\"magnetic\"]"),
            Selector::Any(list) => {
                for (i, s) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{s}")?;
                }
                Ok(())
            }
        }
    }
}

/// Scroll distance inserted below a pinned section.
///
/// Elements whose document top is at or below `below` are pushed down
/// by `amount`, and the document grows by the same distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinSpacer {
    pub below: f64,
    pub amount: f64,
}

/// On-disk page layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLayout {
    #[serde(default)]
    pub viewport: ViewportSize,

    /// Total document height; defaults to the lowest element edge.
    #[serde(default)]
    pub document_height: Option<f64>,

    pub elements: Vec<Element>,
}

/// The page: elements in document order plus viewport and scroll.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    parents: Vec<Option<ElementId>>,
    by_name: HashMap<String, ElementId>,
    viewport: ViewportSize,
    document_height: Option<f64>,
    scroll_offset: f64,
    spacers: Vec<PinSpacer>,
}

impl Scene {
    pub fn new(viewport: ViewportSize) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Build a scene from a parsed layout. Element names must be unique.
    pub fn from_layout(layout: SceneLayout) -> VitrineResult<Self> {
        let mut scene = Scene::new(layout.viewport);
        scene.document_height = layout.document_height;
        for element in layout.elements {
            scene.insert(element)?;
        }
        tracing::debug!(
            elements = scene.len(),
            document_height = scene.document_height(),
            "Scene built from layout"
        );
        Ok(scene)
    }

    pub fn from_json(json: &str) -> VitrineResult<Self> {
        let layout: SceneLayout = serde_json::from_str(json)?;
        Self::from_layout(layout)
    }

    /// Load a layout file.
    pub fn load_layout(path: &Path) -> VitrineResult<Self> {
        if !path.exists() {
            return Err(VitrineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Append an element in document order. A named parent must already
    /// be in the scene.
    pub fn insert(&mut self, element: Element) -> VitrineResult<ElementId> {
        if self.by_name.contains_key(&element.name) {
            return Err(VitrineError::scene(format!(
                "duplicate element name: {}",
                element.name
            )));
        }
        let parent = match &element.parent {
            Some(name) => Some(self.find(name).ok_or_else(|| {
                VitrineError::scene(format!(
                    "parent '{name}' of '{}' must come before it",
                    element.name
                ))
            })?),
            None => None,
        };
        let id = ElementId(self.elements.len());
        self.by_name.insert(element.name.clone(), id);
        self.elements.push(element);
        self.parents.push(parent);
        Ok(id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Pin offset of the element plus that of every ancestor.
    pub fn total_pin_offset(&self, id: ElementId) -> f64 {
        let mut total = 0.0;
        let mut current = Some(id);
        while let Some(cur) = current {
            if let Some(element) = self.get(cur) {
                total += element.pin_offset;
            }
            current = self.parent(cur);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.by_name.get(name).copied()
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| selector.matches(e))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i), e))
    }

    pub fn visual(&self, id: ElementId) -> Option<&VisualState> {
        self.get(id).map(|e| &e.visual)
    }

    pub fn property(&self, id: ElementId, property: Property) -> Option<f64> {
        self.visual(id).map(|v| v.get(property))
    }

    /// Write one property. Missing elements are ignored.
    pub fn set_property(&mut self, id: ElementId, property: Property, value: f64) {
        if let Some(element) = self.get_mut(id) {
            element.visual.set(property, value);
        }
    }

    /// Replace a whole visual state. Missing elements are ignored.
    pub fn set_visual(&mut self, id: ElementId, visual: VisualState) {
        if let Some(element) = self.get_mut(id) {
            element.visual = visual;
        }
    }

    pub fn set_pin_offset(&mut self, id: ElementId, offset: f64) {
        if let Some(element) = self.get_mut(id) {
            element.pin_offset = offset;
        }
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Set the scroll offset, clamped to the scrollable range.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.scroll_offset = offset.clamp(0.0, self.max_scroll());
        }
    }

    /// Height of the document including pin spacing.
    pub fn document_height(&self) -> f64 {
        let laid_out = self.document_height.unwrap_or_else(|| {
            self.elements
                .iter()
                .map(|e| e.rect.bottom())
                .fold(0.0, f64::max)
        });
        laid_out + self.pin_spacing()
    }

    /// Replace the pin spacers. The scroll offset is re-clamped.
    pub fn set_pin_spacers(&mut self, spacers: Vec<PinSpacer>) {
        self.spacers = spacers
            .into_iter()
            .filter(|s| s.amount.is_finite() && s.amount > 0.0)
            .collect();
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Total distance added by pinned sections.
    pub fn pin_spacing(&self) -> f64 {
        self.spacers.iter().map(|s| s.amount).sum()
    }

    fn spacing_above(&self, y: f64) -> f64 {
        self.spacers
            .iter()
            .filter(|s| s.below <= y)
            .map(|s| s.amount)
            .sum()
    }

    /// Document-space box including pin spacing, without animation.
    pub fn layout_rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        Some(element.rect.translated(0.0, self.spacing_above(element.rect.y)))
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    /// Document-space box with the animated transform and any pinning
    /// (own or inherited) applied.
    pub fn transformed_rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.get(id)?;
        let rect = self.layout_rect(id)?;
        let (tx, ty) = element.visual.translation(&rect);
        let (sx, sy) = element.visual.effective_scale();
        Some(
            rect.scaled_about_center(sx, sy)
                .translated(tx, ty + self.total_pin_offset(id)),
        )
    }

    /// Live viewport-space box (what `getBoundingClientRect` reports).
    pub fn viewport_rect(&self, id: ElementId) -> Option<Rect> {
        self.transformed_rect(id)
            .map(|r| r.translated(0.0, -self.scroll_offset))
    }

    /// Last candidate (topmost in document order) whose live box contains `point`.
    pub fn hit_test(&self, point: Point2D, candidates: &[ElementId]) -> Option<ElementId> {
        candidates
            .iter()
            .rev()
            .copied()
            .find(|id| self.viewport_rect(*id).is_some_and(|r| r.contains(point)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new(ViewportSize::new(1000.0, 800.0));
        scene
            .insert(Element::new("hero", "section", Rect::new(0.0, 0.0, 1000.0, 800.0)))
            .unwrap();
        scene
            .insert(
                Element::new("cta", "a", Rect::new(100.0, 500.0, 200.0, 40.0)).with_class("btn"),
            )
            .unwrap();
        scene
            .insert(
                Element::new("card", "div", Rect::new(0.0, 1200.0, 400.0, 300.0))
                    .with_class("exp-card")
                    .magnetic(),
            )
            .unwrap();
        scene
            .insert(Element::new("footer", "footer", Rect::new(0.0, 2000.0, 1000.0, 200.0)))
            .unwrap();
        scene
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut scene = sample_scene();
        let err = scene
            .insert(Element::new("hero", "div", Rect::default()))
            .unwrap_err();
        assert!(matches!(err, VitrineError::Scene { .. }));
    }

    #[test]
    fn test_selectors() {
        let scene = sample_scene();
        assert_eq!(scene.select(&".exp-card".parse().unwrap()), vec![ElementId(2)]);
        assert_eq!(scene.select(&"#footer".parse().unwrap()), vec![ElementId(3)]);
        assert_eq!(
            scene.select(&Selector::interactive()),
            vec![ElementId(1), ElementId(2)]
        );
        let parsed: Selector = "a, button, [data-cursor=\"magnetic\"], input, textarea"
            .parse()
            .unwrap();
        assert_eq!(parsed, Selector::interactive());
        assert!("div > p".parse::<Selector>().is_err());
    }

    #[test]
    fn test_scroll_clamped_to_document() {
        let mut scene = sample_scene();
        assert_eq!(scene.document_height(), 2200.0);
        scene.set_scroll_offset(5000.0);
        assert_eq!(scene.scroll_offset(), 1400.0);
        scene.set_scroll_offset(-10.0);
        assert_eq!(scene.scroll_offset(), 0.0);

        scene.set_pin_spacers(vec![PinSpacer {
            below: 1500.0,
            amount: 2500.0,
        }]);
        scene.set_scroll_offset(5000.0);
        assert_eq!(scene.scroll_offset(), 3900.0);

        // The footer sits below the spacer, the card above it
        let footer = scene.find("footer").unwrap();
        let card = scene.find("card").unwrap();
        assert_eq!(scene.layout_rect(footer).unwrap().y, 4500.0);
        assert_eq!(scene.layout_rect(card).unwrap().y, 1200.0);
    }

    #[test]
    fn test_viewport_rect_applies_transform_and_scroll() {
        let mut scene = sample_scene();
        let cta = scene.find("cta").unwrap();
        scene.set_property(cta, Property::X, 10.0);
        scene.set_property(cta, Property::YPercent, -50.0);
        scene.set_scroll_offset(100.0);

        let r = scene.viewport_rect(cta).unwrap();
        assert!((r.x - 110.0).abs() < 1e-9);
        assert!((r.y - (500.0 - 20.0 - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_uses_live_boxes() {
        let mut scene = sample_scene();
        let candidates = scene.select(&Selector::interactive());
        assert_eq!(
            scene.hit_test(Point2D::new(150.0, 520.0), &candidates),
            Some(ElementId(1))
        );
        scene.set_scroll_offset(600.0);
        assert_eq!(scene.hit_test(Point2D::new(150.0, 520.0), &candidates), None);
        assert_eq!(
            scene.hit_test(Point2D::new(50.0, 700.0), &candidates),
            Some(ElementId(2))
        );
    }

    #[test]
    fn test_children_follow_pinned_parent() {
        let mut scene = sample_scene();
        let hero = scene.find("hero").unwrap();
        let title = scene
            .insert(
                Element::new("title", "h1", Rect::new(100.0, 200.0, 400.0, 100.0))
                    .with_parent("hero"),
            )
            .unwrap();
        let word = scene
            .insert(
                Element::new("word", "span", Rect::new(120.0, 210.0, 80.0, 80.0))
                    .with_parent("title"),
            )
            .unwrap();
        assert_eq!(scene.parent(word), Some(title));
        assert_eq!(scene.parent(title), Some(hero));
        assert_eq!(scene.parent(hero), None);

        scene.set_scroll_offset(300.0);
        scene.set_pin_offset(hero, 300.0);
        assert_eq!(scene.total_pin_offset(word), 300.0);
        assert_eq!(scene.viewport_rect(title).unwrap().y, 200.0);
        assert_eq!(scene.viewport_rect(word).unwrap().y, 210.0);

        // Unrelated elements keep scrolling
        let cta = scene.find("cta").unwrap();
        assert_eq!(scene.viewport_rect(cta).unwrap().y, 200.0);
    }

    #[test]
    fn test_parent_must_precede_child() {
        let mut scene = sample_scene();
        let err = scene
            .insert(Element::new("orphan", "p", Rect::default()).with_parent("later"))
            .unwrap_err();
        assert!(matches!(err, VitrineError::Scene { .. }));

        let json = r#"{
            "viewport": {"width": 800.0, "height": 600.0},
            "elements": [
                {"name": "box", "rect": {"x": 0, "y": 0, "w": 800, "h": 600}},
                {"name": "label", "parent": "box", "rect": {"x": 10, "y": 10, "w": 100, "h": 20}}
            ]
        }"#;
        let scene = Scene::from_json(json).unwrap();
        let label = scene.find("label").unwrap();
        assert_eq!(scene.parent(label), scene.find("box"));
    }

    #[test]
    fn test_set_ignores_non_finite() {
        let mut v = VisualState::IDENTITY;
        v.set(Property::Opacity, f64::NAN);
        assert_eq!(v.opacity, 1.0);
    }

    #[test]
    fn test_layout_json_partial_initial_state() {
        let json = r#"{
            "viewport": {"width": 1280.0, "height": 720.0},
            "elements": [
                {"name": "heading", "tag": "h2", "rect": {"x": 0, "y": 900, "w": 600, "h": 80},
                 "initial": {"opacity": 0.0}}
            ]
        }"#;
        let scene = Scene::from_json(json).unwrap();
        let heading = scene.find("heading").unwrap();
        let visual = scene.visual(heading).unwrap();
        assert_eq!(visual.opacity, 0.0);
        assert_eq!(visual.scale, 1.0);
        assert_eq!(scene.document_height(), 980.0);
    }

    #[test]
    fn test_css_transform_format() {
        let mut v = VisualState::IDENTITY;
        v.x = 12.0;
        v.scale = 1.5;
        assert_eq!(
            v.css_transform(&Rect::new(0.0, 0.0, 10.0, 10.0)),
            "translate3d(12.00px, 0.00px, 0) scale(1.5000)"
        );
    }
}
