//! Mouse-driven drag engine.
//!
//! The UI registers draggable handles and drop targets every frame, from the
//! layout it is about to draw. The engine owns the gesture: it turns raw mouse
//! positions into an ordered drop-target list (innermost first), diffs that
//! list between updates, and reports lifecycle notifications as data. Nothing
//! here touches the board; a completed drop is handed back to the caller for
//! the monitors to resolve.

use ratatui::layout::{Position, Rect};
use tracing::debug;

use super::edge::Edge;
use super::payload::{attach_closest_edge, DragPayload, DragSource, ElementKey, TargetData};

/// Something that can be picked up. `handle` is where a mouse down starts the
/// gesture; `rect` is the whole element, used for the preview offset.
#[derive(Debug, Clone)]
pub struct DraggableRegion {
    pub element: ElementKey,
    pub handle: Rect,
    pub rect: Rect,
    pub data: DragPayload,
}

/// Something that can be dropped on.
#[derive(Debug, Clone)]
pub struct DropTargetRegion {
    pub element: ElementKey,
    /// Enclosing drop target, used to order hits innermost first.
    pub parent: Option<ElementKey>,
    /// Hit area.
    pub rect: Rect,
    /// Rect the closest edge is resolved against. Usually equal to `rect`.
    pub anchor: Rect,
    pub data: TargetData,
    /// Keep this target while the pointer is over nothing at the same depth.
    pub sticky: bool,
    pub allowed_edges: &'static [Edge],
    pub can_drop: fn(&DragSource) -> bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTargetRecord {
    pub element: ElementKey,
    pub data: TargetData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocation {
    pub input: Position,
    /// Innermost first.
    pub drop_targets: Vec<DropTargetRecord>,
}

impl DragLocation {
    pub fn innermost(&self) -> Option<&DropTargetRecord> {
        self.drop_targets.first()
    }

    fn contains(&self, element: &ElementKey) -> bool {
        self.find(element).is_some()
    }

    fn find(&self, element: &ElementKey) -> Option<&DropTargetRecord> {
        self.drop_targets.iter().find(|r| &r.element == element)
    }

    fn same_elements(&self, other: &DragLocation) -> bool {
        self.drop_targets.len() == other.drop_targets.len()
            && self
                .drop_targets
                .iter()
                .zip(&other.drop_targets)
                .all(|(a, b)| a.element == b.element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocationHistory {
    pub initial: DragLocation,
    pub previous: DragLocation,
    pub current: DragLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEventKind {
    GenerateDragPreview,
    DragStart,
    DropTargetChange,
    DragEnter,
    Drag,
    DragLeave,
    Drop,
}

/// Which registration of an element a notification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Draggable,
    DropTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub element: ElementKey,
    pub role: Role,
    pub kind: DragEventKind,
    /// The target's own record, for drop-target notifications.
    pub self_data: Option<TargetData>,
}

/// A notification as delivered to a listener.
#[derive(Debug, Clone, Copy)]
pub struct DragEvent<'a> {
    pub kind: DragEventKind,
    pub source: &'a DragSource,
    pub location: &'a DragLocationHistory,
    pub self_data: Option<&'a TargetData>,
}

/// Floating ghost drawn under the pointer while dragging. The content comes
/// from the drag source; this only fixes its size and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPreview {
    pub width: u16,
    pub height: u16,
    /// Pointer position relative to the ghost's top-left corner.
    pub offset: Position,
    pub tilted: bool,
}

impl DragPreview {
    /// Where to draw the ghost for a pointer at `input`.
    pub fn area(&self, input: Position) -> Rect {
        Rect::new(
            input.x.saturating_sub(self.offset.x),
            input.y.saturating_sub(self.offset.y),
            self.width,
            self.height,
        )
    }
}

/// Keep the pointer at the same spot on the ghost as it was on the element.
pub fn preserve_offset_on_source(element: Rect, input: Position) -> Position {
    Position::new(
        input.x.saturating_sub(element.x),
        input.y.saturating_sub(element.y),
    )
}

pub trait DragListener {
    fn on_drag_event(&mut self, element: &ElementKey, role: Role, event: &DragEvent<'_>);

    /// Asked once per gesture, before drag start, for the dragged element's ghost.
    fn on_generate_preview(
        &mut self,
        _element: &ElementKey,
        _source: &DragSource,
        _input: Position,
    ) -> Option<DragPreview> {
        None
    }
}

/// The notifications produced by one engine step.
#[derive(Debug, Clone)]
pub struct DragDispatch {
    pub source: DragSource,
    pub location: DragLocationHistory,
    pub notifications: Vec<Notification>,
    /// The gesture ended in a drop that monitors should see. Cancelled
    /// gestures never set this.
    pub completed: bool,
}

impl DragDispatch {
    /// Hand every notification to `listener`, in order. Returns the preview
    /// produced for `GenerateDragPreview`, if any.
    pub fn deliver(&self, listener: &mut dyn DragListener) -> Option<DragPreview> {
        let mut preview = None;
        for note in &self.notifications {
            if note.kind == DragEventKind::GenerateDragPreview {
                preview =
                    listener.on_generate_preview(&note.element, &self.source, self.location.initial.input);
                continue;
            }
            let event = DragEvent {
                kind: note.kind,
                source: &self.source,
                location: &self.location,
                self_data: note.self_data.as_ref(),
            };
            listener.on_drag_event(&note.element, note.role, &event);
        }
        preview
    }

    /// The gesture is over, by drop or cancel.
    pub fn is_finished(&self) -> bool {
        self.notifications
            .iter()
            .any(|n| n.role == Role::Draggable && n.kind == DragEventKind::Drop)
    }
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Pending {
        origin: Position,
        region: DraggableRegion,
    },
    Dragging {
        source: DragSource,
        location: DragLocationHistory,
    },
}

#[derive(Debug, Default)]
pub struct DragEngine {
    draggables: Vec<DraggableRegion>,
    targets: Vec<DropTargetRegion>,
    phase: Phase,
}

fn note(element: &ElementKey, role: Role, kind: DragEventKind, self_data: Option<&TargetData>) -> Notification {
    Notification {
        element: element.clone(),
        role,
        kind,
        self_data: self_data.cloned(),
    }
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's registrations.
    pub fn begin_frame(&mut self) {
        self.draggables.clear();
        self.targets.clear();
    }

    pub fn register_draggable(&mut self, region: DraggableRegion) {
        self.draggables.push(region);
    }

    pub fn register_drop_target(&mut self, region: DropTargetRegion) {
        self.targets.push(region);
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.phase {
            Phase::Dragging { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&DragLocationHistory> {
        match &self.phase {
            Phase::Dragging { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Mouse down. Returns whether it landed on a drag handle.
    pub fn pointer_down(&mut self, pos: Position) -> bool {
        if !matches!(self.phase, Phase::Idle) {
            return false;
        }
        // Later registrations are drawn on top.
        let Some(region) = self.draggables.iter().rev().find(|d| d.handle.contains(pos)) else {
            return false;
        };
        self.phase = Phase::Pending {
            origin: pos,
            region: region.clone(),
        };
        true
    }

    /// Mouse moved with the button held.
    pub fn pointer_move(&mut self, pos: Position) -> Option<DragDispatch> {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => None,
            Phase::Pending { origin, region } if origin == pos => {
                self.phase = Phase::Pending { origin, region };
                None
            }
            Phase::Pending { origin, region } => Some(self.start(origin, region, pos)),
            Phase::Dragging { source, mut location } => {
                let notifications = self.update(&source, &mut location, pos);
                Some(self.keep_dragging(source, location, notifications))
            }
        }
    }

    /// Re-run hit testing at the last pointer position, after content moved
    /// under a still pointer (auto-scroll, relayout).
    pub fn refresh(&mut self) -> Option<DragDispatch> {
        let pos = self.location()?.current.input;
        self.pointer_move(pos)
    }

    /// Mouse released. A pending press that never moved is a plain click and
    /// produces nothing.
    pub fn pointer_up(&mut self, pos: Position) -> Option<DragDispatch> {
        let Phase::Dragging { source, mut location } = std::mem::take(&mut self.phase) else {
            return None;
        };
        let mut notifications = if pos != location.current.input {
            self.update(&source, &mut location, pos)
        } else {
            Vec::new()
        };
        for record in &location.current.drop_targets {
            notifications.push(note(&record.element, Role::DropTarget, DragEventKind::Drop, Some(&record.data)));
        }
        notifications.push(note(&source.element, Role::Draggable, DragEventKind::Drop, None));
        debug!(
            element = ?source.element,
            target = ?location.current.innermost().map(|r| &r.element),
            "drop"
        );
        Some(DragDispatch {
            source,
            location,
            notifications,
            completed: true,
        })
    }

    /// Abandon the gesture: targets are left, the draggable sees a drop with
    /// no targets, and monitors are not told.
    pub fn cancel(&mut self) -> Option<DragDispatch> {
        let Phase::Dragging { source, mut location } = std::mem::take(&mut self.phase) else {
            return None;
        };
        location.previous = location.current.clone();
        let leaving = std::mem::take(&mut location.current.drop_targets);
        let mut notifications: Vec<Notification> = leaving
            .iter()
            .map(|r| note(&r.element, Role::DropTarget, DragEventKind::DragLeave, Some(&r.data)))
            .collect();
        notifications.push(note(&source.element, Role::Draggable, DragEventKind::Drop, None));
        debug!(element = ?source.element, "drag cancelled");
        Some(DragDispatch {
            source,
            location,
            notifications,
            completed: false,
        })
    }

    fn keep_dragging(
        &mut self,
        source: DragSource,
        location: DragLocationHistory,
        notifications: Vec<Notification>,
    ) -> DragDispatch {
        let dispatch = DragDispatch {
            source: source.clone(),
            location: location.clone(),
            notifications,
            completed: false,
        };
        self.phase = Phase::Dragging { source, location };
        dispatch
    }

    fn start(&mut self, origin: Position, region: DraggableRegion, pos: Position) -> DragDispatch {
        let source = DragSource {
            element: region.element,
            rect: region.rect,
            data: region.data,
        };
        let initial = DragLocation {
            input: origin,
            drop_targets: self.hit_test(&source, origin, &[]),
        };
        let mut location = DragLocationHistory {
            initial: initial.clone(),
            previous: initial.clone(),
            current: initial,
        };
        debug!(element = ?source.element, x = origin.x, y = origin.y, "drag started");

        let mut notifications = vec![
            note(&source.element, Role::Draggable, DragEventKind::GenerateDragPreview, None),
            note(&source.element, Role::Draggable, DragEventKind::DragStart, None),
        ];
        for record in &location.current.drop_targets {
            notifications.push(note(&record.element, Role::DropTarget, DragEventKind::DragStart, Some(&record.data)));
        }
        notifications.extend(self.update(&source, &mut location, pos));
        self.keep_dragging(source, location, notifications)
    }

    fn update(
        &self,
        source: &DragSource,
        location: &mut DragLocationHistory,
        pos: Position,
    ) -> Vec<Notification> {
        let next = DragLocation {
            input: pos,
            drop_targets: self.hit_test(source, pos, &location.current.drop_targets),
        };
        location.previous = std::mem::replace(&mut location.current, next);
        let (previous, current) = (&location.previous, &location.current);

        let mut out = Vec::new();
        if !previous.same_elements(current) {
            for record in &previous.drop_targets {
                let data = current.find(&record.element).map_or(&record.data, |r| &r.data);
                out.push(note(&record.element, Role::DropTarget, DragEventKind::DropTargetChange, Some(data)));
            }
            let entering: Vec<&DropTargetRecord> = current
                .drop_targets
                .iter()
                .filter(|r| !previous.contains(&r.element))
                .collect();
            for record in &entering {
                out.push(note(&record.element, Role::DropTarget, DragEventKind::DropTargetChange, Some(&record.data)));
            }
            for record in previous.drop_targets.iter().filter(|r| !current.contains(&r.element)) {
                out.push(note(&record.element, Role::DropTarget, DragEventKind::DragLeave, Some(&record.data)));
            }
            for record in entering {
                out.push(note(&record.element, Role::DropTarget, DragEventKind::DragEnter, Some(&record.data)));
            }
        }
        for record in &current.drop_targets {
            out.push(note(&record.element, Role::DropTarget, DragEventKind::Drag, Some(&record.data)));
        }
        out.push(note(&source.element, Role::Draggable, DragEventKind::Drag, None));
        out
    }

    fn region(&self, element: &ElementKey) -> Option<&DropTargetRegion> {
        self.targets.iter().find(|t| &t.element == element)
    }

    fn depth(&self, region: &DropTargetRegion) -> usize {
        let mut depth = 0;
        let mut parent = region.parent.as_ref();
        while let Some(key) = parent {
            depth += 1;
            if depth > self.targets.len() {
                break;
            }
            parent = self.region(key).and_then(|r| r.parent.as_ref());
        }
        depth
    }

    /// Drop targets under `pos` that accept `source`, innermost first. Sticky
    /// targets from `previous` survive while nothing as deep or deeper is hit.
    fn hit_test(&self, source: &DragSource, pos: Position, previous: &[DropTargetRecord]) -> Vec<DropTargetRecord> {
        let mut hits: Vec<(usize, &DropTargetRegion)> = self
            .targets
            .iter()
            .filter(|t| t.rect.contains(pos) && (t.can_drop)(source))
            .map(|t| (self.depth(t), t))
            .collect();

        for record in previous {
            let Some(region) = self.region(&record.element) else {
                continue;
            };
            if !region.sticky || !(region.can_drop)(source) {
                continue;
            }
            if hits.iter().any(|(_, t)| t.element == region.element) {
                continue;
            }
            let depth = self.depth(region);
            if hits.iter().all(|(d, _)| *d < depth) {
                hits.push((depth, region));
            }
        }

        hits.sort_by(|a, b| b.0.cmp(&a.0));
        hits.into_iter()
            .map(|(_, region)| DropTargetRecord {
                element: region.element.clone(),
                data: attach_closest_edge(region.data.clone(), region.anchor, pos, region.allowed_edges),
            })
            .collect()
    }
}
