//! Scroll reveal and counter wiring.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use tracing::{debug, warn};
use web_sys::Element;

use super::dom;
use super::observer::{self, DomObserver};
use crate::config::{CounterConfig, RevealConfig};
use crate::counter::{Counter, CounterController, CounterRun, parse_target};
use crate::reveal::{RevealController, RevealSurface};
use crate::visibility::VisibilitySource;

struct DomRevealSurface {
    visible_class: String,
}

impl RevealSurface<Element> for DomRevealSurface {
    fn set_delay(&mut self, element: &Element, delay_ms: u32) {
        dom::set_style(element, "transition-delay", &format!("{delay_ms}ms"));
    }

    fn mark_visible(&mut self, element: &Element) {
        dom::add_class(element, &self.visible_class);
    }
}

pub fn activate_reveal(config: &RevealConfig) {
    let elements = dom::query_all(&config.selector);
    if elements.is_empty() {
        return;
    }

    let slot: Rc<RefCell<Option<RevealController<Element>>>> = Rc::new(RefCell::new(None));
    let mut surface = DomRevealSurface {
        visible_class: config.visible_class.clone(),
    };

    let native = {
        let slot = Rc::clone(&slot);
        let mut surface = DomRevealSurface {
            visible_class: config.visible_class.clone(),
        };
        observer::create(&config.observe_options(), move |events, observer| {
            let mut slot = slot.borrow_mut();
            let Some(controller) = slot.as_mut() else {
                return;
            };
            for event in &events {
                controller.handle(event, observer, &mut surface);
            }
        })
    };

    let mut source = VisibilitySource::detect(native);
    let controller = RevealController::activate(elements, config, &mut source, &mut surface);
    *slot.borrow_mut() = Some(controller);
}

pub fn activate_counters(config: &CounterConfig) {
    let groups = group_by_container(config);
    if groups.is_empty() {
        return;
    }

    let controllers: Rc<RefCell<Vec<CounterController<Element>>>> =
        Rc::new(RefCell::new(Vec::with_capacity(groups.len())));

    let native = {
        let controllers = Rc::clone(&controllers);
        observer::create(&config.observe_options(), move |events, observer| {
            let mut controllers = controllers.borrow_mut();
            for event in &events {
                for controller in controllers.iter_mut() {
                    for run in controller.handle(event, observer) {
                        CounterAnimation::start(run);
                    }
                }
            }
        })
    };

    let mut source: VisibilitySource<DomObserver> = VisibilitySource::detect(native);
    for (container, counters) in groups {
        let (controller, runs) =
            CounterController::activate(container, counters, config, &mut source);
        for run in runs {
            CounterAnimation::start(run);
        }
        controllers.borrow_mut().push(controller);
    }
}

/// Counters bucketed by their stats container, in document order. A counter
/// outside any container is its own trigger.
fn group_by_container(config: &CounterConfig) -> Vec<(Element, Vec<Counter<Element>>)> {
    let mut groups: Vec<(Element, Vec<Counter<Element>>)> = Vec::new();
    for element in dom::query_all(&config.selector) {
        let raw = element.get_attribute(&config.target_attribute).unwrap_or_default();
        let Some(target) = parse_target(&raw) else {
            warn!(value = %raw, "counter target is not a number, skipping");
            continue;
        };
        let container = element
            .closest(&config.container_selector)
            .ok()
            .flatten()
            .unwrap_or_else(|| element.clone());
        let counter = Counter { element, target };
        match groups.iter_mut().find(|(c, _)| *c == container) {
            Some((_, counters)) => counters.push(counter),
            None => groups.push((container, vec![counter])),
        }
    }
    groups
}

/// Drives one [`CounterRun`] with animation frames until it finishes.
struct CounterAnimation {
    run: RefCell<CounterRun<Element>>,
    frame: RefCell<Option<AnimationFrame>>,
}

impl CounterAnimation {
    fn start(run: CounterRun<Element>) {
        let animation = Rc::new(Self {
            run: RefCell::new(run),
            frame: RefCell::new(None),
        });
        animation.schedule();
    }

    fn schedule(self: &Rc<Self>) {
        let animation = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| {
            animation.tick(timestamp);
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn tick(self: &Rc<Self>, timestamp: f64) {
        self.frame.borrow_mut().take();
        let (frame, target) = {
            let mut run = self.run.borrow_mut();
            let frame = run.step(timestamp);
            run.element().set_text_content(Some(&frame.text));
            (frame, run.target())
        };
        if frame.finished {
            debug!(value = target, "counter finished");
        } else {
            self.schedule();
        }
    }
}
