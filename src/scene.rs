//! Scene files: a TOML description of views and pin requests.
//!
//! Scenes drive the CLI and integration tests. Loading is strict —
//! unknown names, duplicate names, or bad enum values fail loudly —
//! while the apply-family calls the build step issues keep their usual
//! degrade-on-failure behavior.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::{EngineConfig, LayoutDirection, LayoutEngine};
use crate::geometry::Rect;
use crate::options::PinOptions;
use crate::tree::{View, ViewId};

/// Errors that can occur when loading or building a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate view name '{0}'")]
    DuplicateView(String),

    #[error("unknown view name '{0}'")]
    UnknownView(String),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// TOML structure for deserializing scenes.
#[derive(Debug, Clone, Deserialize)]
struct TomlScene {
    direction: Option<String>,
    #[serde(default)]
    views: Vec<TomlView>,
    #[serde(default)]
    pins: Vec<TomlPin>,
    #[serde(default)]
    ratios: Vec<TomlRatio>,
    #[serde(default)]
    adjacent: Vec<TomlAdjacent>,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlView {
    name: String,
    parent: Option<String>,
    frame: Option<TomlFrame>,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlFrame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlPin {
    view: String,
    reference: Option<String>,
    top: Option<f64>,
    leading: Option<f64>,
    bottom: Option<f64>,
    trailing: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default)]
    center_x: bool,
    #[serde(default)]
    center_y: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlRatio {
    view: String,
    reference: String,
    dimension: String,
    multiplier: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct TomlAdjacent {
    view: String,
    other: String,
    side: String,
    #[serde(default)]
    gap: f64,
}

/// A parsed scene, ready to be built into an engine.
#[derive(Debug, Clone)]
pub struct Scene {
    direction: LayoutDirection,
    doc: TomlScene,
}

impl Scene {
    /// Parse a scene from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let doc: TomlScene = toml::from_str(content)?;
        let direction = match doc.direction.as_deref() {
            None | Some("ltr") => LayoutDirection::LeftToRight,
            Some("rtl") => LayoutDirection::RightToLeft,
            Some(other) => {
                return Err(SceneError::InvalidValue {
                    field: "direction",
                    value: other.to_string(),
                })
            }
        };
        Ok(Scene { direction, doc })
    }

    /// Load a scene from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Override the layout direction (CLI flag).
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Build an engine from this scene, applying every declaration in
    /// file order. Returns the engine and the name-to-id map.
    pub fn build(&self) -> Result<(LayoutEngine, HashMap<String, ViewId>), SceneError> {
        let mut engine = LayoutEngine::with_config(
            EngineConfig::new().with_direction(self.direction),
        );
        let mut names: HashMap<String, ViewId> = HashMap::new();

        for decl in &self.doc.views {
            if names.contains_key(&decl.name) {
                return Err(SceneError::DuplicateView(decl.name.clone()));
            }
            let mut view = View::named(&decl.name);
            if let Some(frame) = &decl.frame {
                view = view.with_frame(Rect::new(frame.x, frame.y, frame.width, frame.height));
            }
            let id = match &decl.parent {
                Some(parent) => {
                    let parent_id = lookup(&names, parent)?;
                    engine.add_child(parent_id, view)
                }
                None => engine.add_view(view),
            };
            names.insert(decl.name.clone(), id);
        }

        for decl in &self.doc.pins {
            let view = lookup(&names, &decl.view)?;
            let reference = match &decl.reference {
                Some(name) => Some(lookup(&names, name)?),
                None => None,
            };
            let mut options = PinOptions {
                top: decl.top,
                leading: decl.leading,
                bottom: decl.bottom,
                trailing: decl.trailing,
                width: decl.width,
                height: decl.height,
                ..PinOptions::default()
            };
            if decl.center_x {
                options = options.center_x();
            }
            if decl.center_y {
                options = options.center_y();
            }
            engine.apply(view, reference, options);
        }

        for decl in &self.doc.ratios {
            let view = lookup(&names, &decl.view)?;
            let reference = lookup(&names, &decl.reference)?;
            match decl.dimension.as_str() {
                "width" => engine.apply_relative_width(view, reference, decl.multiplier),
                "height" => engine.apply_relative_height(view, reference, decl.multiplier),
                other => {
                    return Err(SceneError::InvalidValue {
                        field: "dimension",
                        value: other.to_string(),
                    })
                }
            };
        }

        for decl in &self.doc.adjacent {
            let view = lookup(&names, &decl.view)?;
            let other = lookup(&names, &decl.other)?;
            match decl.side.as_str() {
                "trailing" => engine.apply_trailing(view, other, decl.gap),
                "leading" => engine.apply_leading(view, other, decl.gap),
                "above" => engine.apply_above(view, other, decl.gap),
                "below" => engine.apply_below(view, other, decl.gap),
                bad => {
                    return Err(SceneError::InvalidValue {
                        field: "side",
                        value: bad.to_string(),
                    })
                }
            };
        }

        Ok((engine, names))
    }
}

fn lookup(names: &HashMap<String, ViewId>, name: &str) -> Result<ViewId, SceneError> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| SceneError::UnknownView(name.to_string()))
}

/// Deterministic, name-sorted table of solved frames.
pub fn frame_report(engine: &LayoutEngine, names: &HashMap<String, ViewId>) -> String {
    let mut sorted: Vec<(&str, ViewId)> = names
        .iter()
        .map(|(name, &id)| (name.as_str(), id))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    // Normalize -0.0 so reports stay byte-stable.
    let n = |v: f64| if v == 0.0 { 0.0 } else { v };

    let mut out = String::new();
    for (name, id) in sorted {
        if let Some(frame) = engine.frame(id) {
            out.push_str(&format!(
                "{}: x={:.1} y={:.1} width={:.1} height={:.1}\n",
                name,
                n(frame.x),
                n(frame.y),
                n(frame.width),
                n(frame.height)
            ));
        }
    }
    out
}
