//! Motion declarations for the portfolio page.
//!
//! Each section registers its animations in its own context, looked up by
//! element name (`#about-heading`) or class (`.exp-card`) in the scene.
//! Missing elements drop the animations that need them and nothing else.

use serde::Serialize;
use vitrine_common::{ScrollSettings, VitrineResult};
use vitrine_scene_model::{ElementId, Property, Scene, Selector};

use crate::easing::Ease;
use crate::scroll::{ScrollController, ScrollTarget, ScrollToOptions};
use crate::sequencer::{ContextId, Driver, EntryId, MotionContext, ScrubSpec, Sequencer};
use crate::timeline::{Position, Timeline};
use crate::trigger::TriggerSpec;
use crate::tween::{TargetValue, Tween};

/// Seconds before the hero intro starts.
pub const HERO_DELAY: f64 = 0.5;

/// Scroll distance the contact outro stays pinned for.
pub const OUTRO_PIN_DISTANCE: &str = "+=2500";

/// Page sections with their own motion context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Hero,
    About,
    Experience,
    TechStack,
    Projects,
    Contact,
    Navbar,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Hero,
        Section::About,
        Section::Experience,
        Section::TechStack,
        Section::Projects,
        Section::Contact,
        Section::Navbar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Experience => "experience",
            Section::TechStack => "tech",
            Section::Projects => "projects",
            Section::Contact => "contact",
            Section::Navbar => "navbar",
        }
    }
}

fn class(name: &str) -> Selector {
    Selector::Class(name.to_string())
}

/// Append a tween on `target` if the element exists.
fn step(
    timeline: &mut Timeline,
    target: Option<ElementId>,
    position: Position,
    build: impl FnOnce(Tween) -> Tween,
) {
    if let Some(id) = target {
        timeline.push(build(Tween::on(id)), position);
    }
}

/// Append a staggered tween on `targets` if any exist.
fn group(
    timeline: &mut Timeline,
    targets: Vec<ElementId>,
    position: Position,
    build: impl FnOnce(Tween) -> Tween,
) {
    if !targets.is_empty() {
        timeline.push(build(Tween::new(targets)), position);
    }
}

/// Register a persistent reveal of `build(targets)` triggered by `trigger`.
fn reveal(
    ctx: &mut MotionContext<'_>,
    label: &str,
    trigger: Option<ElementId>,
    targets: Vec<ElementId>,
    start: &str,
    end: &str,
    build: impl FnOnce(Tween) -> Tween,
) -> VitrineResult<Option<EntryId>> {
    let Some(trigger) = trigger else {
        tracing::debug!(label, "Reveal trigger missing");
        return Ok(None);
    };
    let spec = TriggerSpec::new(trigger, start, end)?;
    let mut timeline = Timeline::new();
    group(&mut timeline, targets, Position::Sequential, build);
    Ok(ctx.add(label, timeline, Driver::Persistent(spec)))
}

fn rise_in(tween: Tween, distance: f64) -> Tween {
    tween
        .from_to(Property::Y, distance, 0.0)
        .from_to(Property::Opacity, 0.0, 1.0)
}

fn hero(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    let line = ctx.find("hero-line");
    let greeting = ctx.find("hero-greeting");
    let name = ctx.find("hero-name");
    let title = ctx.find("hero-title");
    let cta = ctx.find("hero-cta");
    let indicator = ctx.find("hero-scroll-indicator");

    let mut tl = Timeline::new();
    step(&mut tl, line, Position::Sequential, |t| {
        t.from_to(Property::ScaleX, 0.0, 1.0)
            .duration(0.8)
            .ease(Ease::PowerInOut(3))
    });
    step(&mut tl, greeting, Position::Offset(-0.3), |t| {
        rise_in(t, 30.0)
            .from_to(Property::Blur, 10.0, 0.0)
            .duration(0.8)
            .ease(Ease::PowerOut(3))
    });
    step(&mut tl, name, Position::Offset(-0.4), |t| {
        rise_in(t, 80.0)
            .clip_reveal()
            .duration(1.2)
            .ease(Ease::PowerOut(3))
    });
    step(&mut tl, title, Position::Offset(-0.5), |t| {
        rise_in(t, 30.0)
            .from_to(Property::Blur, 8.0, 0.0)
            .duration(0.8)
            .ease(Ease::PowerOut(3))
    });
    step(&mut tl, cta, Position::Offset(-0.3), |t| {
        rise_in(t, 20.0).duration(0.6).ease(Ease::PowerOut(2))
    });
    step(&mut tl, indicator, Position::Offset(-0.2), |t| {
        rise_in(t, 10.0).duration(1.0).ease(Ease::PowerOut(2))
    });

    ctx.add("hero-intro", tl, Driver::Immediate { delay: HERO_DELAY });
    Ok(())
}

fn about(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    let label = ctx.find("about-label");
    reveal(ctx, "about-label", label, label.into_iter().collect(), "top 90%", "top 20%", |t| {
        t.from_to(Property::X, -60.0, 0.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(0.8)
            .ease(Ease::PowerOut(3))
    })?;

    let heading = ctx.find("about-heading");
    reveal(ctx, "about-heading", heading, heading.into_iter().collect(), "top 85%", "top 15%", |t| {
        rise_in(t, 80.0).clip_reveal().duration(1.0).ease(Ease::PowerOut(3))
    })?;

    let text = ctx.find("about-text");
    let paragraphs = ctx.select(&class("about-para"));
    reveal(ctx, "about-text", text, paragraphs, "top 80%", "top 10%", |t| {
        rise_in(t, 50.0)
            .from_to(Property::Blur, 6.0, 0.0)
            .duration(0.8)
            .stagger(0.15)
            .ease(Ease::PowerOut(2))
    })?;

    let stats_block = ctx.find("about-stats");
    let stats = ctx.select(&class("stat-item"));
    reveal(ctx, "about-stats", stats_block, stats, "top 85%", "top 10%", |t| {
        rise_in(t, 40.0)
            .from_to(Property::Scale, 0.9, 1.0)
            .duration(0.6)
            .stagger(0.12)
            .ease(Ease::BackOut { overshoot: 1.4 })
    })?;
    Ok(())
}

fn experience(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    let heading = ctx.find("experience-heading");
    reveal(ctx, "experience-heading", heading, heading.into_iter().collect(), "top 85%", "top 15%", |t| {
        rise_in(t, 60.0).clip_reveal().duration(1.0).ease(Ease::PowerOut(3))
    })?;

    if let (Some(section), Some(line)) = (ctx.find("experience"), ctx.find("experience-line")) {
        let spec = TriggerSpec::new(section, "top 50%", "bottom 60%")?;
        let tl = Timeline::single(
            Tween::on(line)
                .from_to(Property::ScaleY, 0.0, 1.0)
                .ease(Ease::Linear),
        );
        ctx.add(
            "experience-line",
            tl,
            Driver::Scrub(ScrubSpec {
                trigger: spec,
                lag: Some(0.8),
                pin: false,
            }),
        );
    }

    for (i, card) in ctx.select(&class("exp-card")).into_iter().enumerate() {
        let side = if i % 2 == 0 { -80.0 } else { 80.0 };
        reveal(ctx, "exp-card", Some(card), vec![card], "top 88%", "top 20%", |t| {
            t.from_to(Property::X, side, 0.0)
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::Blur, 8.0, 0.0)
                .duration(1.0)
                .ease(Ease::PowerOut(3))
        })?;
    }

    for dot in ctx.select(&class("timeline-dot")) {
        reveal(ctx, "timeline-dot", Some(dot), vec![dot], "top 85%", "top 20%", |t| {
            t.from_to(Property::Scale, 0.0, 1.0)
                .from_to(Property::Opacity, 0.0, 1.0)
                .duration(0.5)
                .ease(Ease::BackOut { overshoot: 2.5 })
        })?;
    }
    Ok(())
}

fn tech_stack(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    let heading = ctx.find("tech-heading");
    reveal(ctx, "tech-heading", heading, heading.into_iter().collect(), "top 90%", "top 20%", |t| {
        t.from_to(Property::X, -40.0, 0.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(0.8)
            .ease(Ease::PowerOut(3))
    })?;

    let section = ctx.find("tech");
    let rows = ctx.select(&class("marquee-row"));
    reveal(ctx, "marquee-rows", section, rows, "top 90%", "top 15%", |t| {
        rise_in(t, 30.0)
            .duration(0.8)
            .stagger(0.15)
            .ease(Ease::PowerOut(2))
    })?;
    Ok(())
}

fn projects(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    for card in ctx.select(&class("project-card")) {
        reveal(ctx, "project-card", Some(card), vec![card], "top 90%", "top 15%", |t| {
            rise_in(t, 100.0)
                .from_to(Property::Blur, 6.0, 0.0)
                .duration(1.0)
                .ease(Ease::PowerOut(3))
        })?;
    }
    Ok(())
}

fn contact(ctx: &mut MotionContext<'_>) -> VitrineResult<()> {
    let section = ctx.find("contact");
    let heading = ctx.find("contact-heading");
    let slot = ctx.find("contact-slot");
    let elements = ctx.select(&class("contact-reveal"));

    let mut intro = Timeline::new();
    step(&mut intro, heading, Position::Sequential, |t| {
        rise_in(t, 80.0).clip_reveal().duration(1.0).ease(Ease::PowerOut(3))
    });
    group(&mut intro, elements.clone(), Position::Offset(-0.5), |t| {
        rise_in(t, 50.0)
            .from_to(Property::Blur, 6.0, 0.0)
            .duration(0.8)
            .stagger(0.1)
            .ease(Ease::PowerOut(3))
    });
    ctx.add("contact-intro", intro, Driver::Immediate { delay: 0.0 });

    let Some(section) = section else {
        return Ok(());
    };
    let spec = TriggerSpec::new(section, "top top", OUTRO_PIN_DISTANCE)?;

    let mut outro = Timeline::new();
    group(&mut outro, elements, Position::Sequential, |t| {
        t.to(Property::Opacity, 0.0)
            .to(Property::Y, -30.0)
            .to(Property::Blur, 10.0)
            .stagger(0.05)
            .duration(2.0)
    });
    step(&mut outro, heading, Position::Offset(-1.0), |t| {
        t.to(Property::X, TargetValue::CenterInViewportX)
            .to(Property::Y, TargetValue::CenterInViewportY)
            .to(Property::Scale, 1.3)
            .duration(4.0)
            .ease(Ease::PowerInOut(2))
    });
    outro.push(Tween::hold(2.0), Position::Sequential);
    step(&mut outro, slot, Position::Sequential, |t| {
        t.to(Property::YPercent, -75.0).duration(4.0).ease(Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        })
    });
    outro.push(Tween::hold(1.0), Position::Sequential);

    ctx.add(
        "contact-outro",
        outro,
        Driver::Scrub(ScrubSpec {
            trigger: spec,
            lag: Some(1.0),
            pin: true,
        }),
    );
    Ok(())
}

fn navbar(ctx: &mut MotionContext<'_>) -> VitrineResult<Option<EntryId>> {
    let menu = ctx.find("mobile-menu");
    let links = ctx.select(&class("nav-link-mobile"));

    let mut tl = Timeline::new();
    step(&mut tl, menu, Position::Sequential, |t| {
        t.from_to(Property::ClipLeft, 100.0, 0.0)
            .from_to(Property::ClipBottom, 100.0, 0.0)
            .duration(0.6)
            .ease(Ease::PowerInOut(3))
    });
    group(&mut tl, links, Position::Offset(-0.3), |t| {
        rise_in(t, 60.0)
            .from_to(Property::Blur, 8.0, 0.0)
            .stagger(0.1)
            .duration(0.5)
            .ease(Ease::PowerOut(2))
    });
    Ok(ctx.add("mobile-menu", tl, Driver::Manual))
}

/// Navbar state: compact style past a scroll threshold, and the mobile
/// menu, which locks scrolling while open.
#[derive(Debug, Clone)]
pub struct Navbar {
    threshold: f64,
    section_offset: f64,
    scrolled: bool,
    menu_open: bool,
    menu: Option<EntryId>,
}

impl Navbar {
    fn new(settings: &ScrollSettings, menu: Option<EntryId>) -> Self {
        Self {
            threshold: settings.navbar_scrolled_threshold,
            section_offset: settings.section_offset,
            scrolled: false,
            menu_open: false,
            menu,
        }
    }

    /// Update the compact flag. Returns `true` if it changed.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let scrolled = offset > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open or close the mobile menu.
    pub fn toggle_menu(&mut self, sequencer: &mut Sequencer, scroll: &mut ScrollController) {
        if self.menu_open {
            self.close_menu(sequencer, scroll);
        } else {
            self.menu_open = true;
            if let Some(menu) = self.menu {
                sequencer.play(menu);
            }
            scroll.stop();
            tracing::debug!("Mobile menu opened");
        }
    }

    pub fn close_menu(&mut self, sequencer: &mut Sequencer, scroll: &mut ScrollController) {
        if !self.menu_open {
            return;
        }
        self.menu_open = false;
        if let Some(menu) = self.menu {
            sequencer.reverse(menu);
        }
        scroll.start();
        tracing::debug!("Mobile menu closed");
    }

    /// Follow a nav link: close the menu, then scroll to the named
    /// section (or the top for `None`).
    pub fn navigate(
        &mut self,
        target: Option<&str>,
        sequencer: &mut Sequencer,
        scroll: &mut ScrollController,
        scene: &Scene,
    ) -> bool {
        self.close_menu(sequencer, scroll);
        match target {
            None => scroll.scroll_to(ScrollTarget::Top, ScrollToOptions::default(), scene),
            Some(name) => match scene.find(name) {
                Some(id) => scroll.scroll_to(
                    ScrollTarget::Element(id),
                    ScrollToOptions {
                        offset: self.section_offset,
                        ..Default::default()
                    },
                    scene,
                ),
                None => {
                    tracing::debug!(target = name, "Navigation target not found");
                    false
                }
            },
        }
    }
}

/// All page motion, installed section by section.
#[derive(Debug)]
pub struct Site {
    contexts: Vec<(Section, ContextId)>,
    navbar: Navbar,
}

impl Site {
    /// Register every section's animations.
    pub fn install(
        sequencer: &mut Sequencer,
        scene: &mut Scene,
        settings: &ScrollSettings,
    ) -> VitrineResult<Self> {
        let mut contexts = Vec::new();
        let mut menu = None;
        for section in Section::ALL {
            let result = sequencer.context(scene, section.name(), |ctx| match section {
                Section::Hero => hero(ctx),
                Section::About => about(ctx),
                Section::Experience => experience(ctx),
                Section::TechStack => tech_stack(ctx),
                Section::Projects => projects(ctx),
                Section::Contact => contact(ctx),
                Section::Navbar => {
                    menu = navbar(ctx)?;
                    Ok(())
                }
            });
            match result {
                Ok(id) => contexts.push((section, id)),
                Err(e) => {
                    for (_, id) in contexts.iter().rev() {
                        sequencer.revert(*id, scene);
                    }
                    return Err(e);
                }
            }
        }
        tracing::info!(
            sections = contexts.len(),
            entries = sequencer.len(),
            "Site motion installed"
        );
        Ok(Self {
            contexts,
            navbar: Navbar::new(settings, menu),
        })
    }

    pub fn context(&self, section: Section) -> Option<ContextId> {
        self.contexts
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, id)| *id)
    }

    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    pub fn navbar_mut(&mut self) -> &mut Navbar {
        &mut self.navbar
    }

    /// Revert every section, newest first. Safe to call repeatedly.
    pub fn teardown(&mut self, sequencer: &mut Sequencer, scene: &mut Scene) {
        for (section, id) in self.contexts.drain(..).rev() {
            if sequencer.revert(id, scene) {
                tracing::debug!(section = section.name(), "Section motion reverted");
            }
        }
    }
}
