use std::collections::HashSet;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::core::curve::num_text;
use crate::core::{
    Accessor, Accessors, ColorScheme, ContinuousScale, Coordinates, Point, Series,
    SeriesColorContext, finite_or_zero, visible_series,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HoverState, PointMark, nearest_mark};
use crate::render::{Element, KeyedJoin};

use super::dispatch::{ChartEvent, Dispatcher, EventKind};
use super::options::{color_scheme_from_json, field, with_field};

static NEXT_SCATTER_ID: AtomicU32 = AtomicU32::new(1);

/// Plain-data settings of a [`ScatterLayer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScatterConfig {
    pub width: f64,
    pub height: f64,
    /// Animation duration in milliseconds.
    pub duration: u64,
    pub use_log_scale: bool,
    /// Size value of every point, mapped through the point-size scale to an area.
    pub point_size: f64,
    pub point_domain: Option<[f64; 2]>,
    pub point_range: [f64; 2],
    pub x_domain: Option<[f64; 2]>,
    pub y_domain: Option<[f64; 2]>,
    pub force_x: Vec<f64>,
    pub force_y: Vec<f64>,
    pub interactive: bool,
    /// Pointer hit-test radius in pixels.
    pub hit_radius: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            duration: 250,
            use_log_scale: false,
            point_size: 1.0,
            point_domain: None,
            point_range: [16.0, 256.0],
            x_domain: None,
            y_domain: None,
            force_x: Vec::new(),
            force_y: Vec::new(),
            interactive: true,
            hit_radius: 25.0,
        }
    }
}

impl ScatterConfig {
    pub fn validate(&self) -> ChartResult<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("pointSize", self.point_size),
            ("hitRadius", self.hit_radius),
        ] {
            if !value.is_finite() {
                return Err(ChartError::invalid_option(name, "must be finite"));
            }
        }
        if self.hit_radius < 0.0 {
            return Err(ChartError::invalid_option("hitRadius", "must be >= 0"));
        }

        let pairs = [
            ("pointDomain", self.point_domain),
            ("pointRange", Some(self.point_range)),
            ("xDomain", self.x_domain),
            ("yDomain", self.y_domain),
        ];
        for (name, pair) in pairs {
            if pair.is_some_and(|[a, b]| !a.is_finite() || !b.is_finite()) {
                return Err(ChartError::invalid_option(name, "bounds must be finite"));
            }
        }
        if self.point_range.iter().any(|area| *area < 0.0) {
            return Err(ChartError::invalid_option("pointRange", "areas must be >= 0"));
        }

        for (name, forced) in [("forceX", &self.force_x), ("forceY", &self.force_y)] {
            if forced.iter().any(|v| !v.is_finite()) {
                return Err(ChartError::invalid_option(name, "values must be finite"));
            }
        }
        Ok(())
    }
}

/// Point-mark layer that owns the x/y scales a line chart draws against.
///
/// Each instance gets a process-unique id, used for its wrapper class and by
/// hosts that need per-instance element ids (clip paths, gradients).
pub struct ScatterLayer<P = Point> {
    config: ScatterConfig,
    accessors: Accessors<P>,
    color: ColorScheme,
    id: u32,
    x_scale: ContinuousScale,
    y_scale: ContinuousScale,
    marks: Vec<PointMark>,
    hover: HoverState,
    dispatch: Dispatcher,
}

impl<P: Coordinates + 'static> ScatterLayer<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_accessors(Accessors::default())
    }
}

impl<P: Coordinates + 'static> Default for ScatterLayer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ScatterLayer<P> {
    pub fn with_accessors(accessors: Accessors<P>) -> Self {
        let config = ScatterConfig::default();
        let x_scale = ContinuousScale::linear((-1.0, 1.0), (0.0, config.width));
        let y_scale = ContinuousScale::linear((-1.0, 1.0), (config.height, 0.0));
        Self {
            config,
            accessors,
            color: ColorScheme::default(),
            id: NEXT_SCATTER_ID.fetch_add(1, Ordering::Relaxed),
            x_scale,
            y_scale,
            marks: Vec::new(),
            hover: HoverState::Idle,
            dispatch: Dispatcher::new(&[
                EventKind::ElementClick,
                EventKind::ElementMouseover,
                EventKind::ElementMouseout,
            ]),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[must_use]
    pub fn config(&self) -> &ScatterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ScatterConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) {
        self.config.width = width;
    }

    pub fn set_height(&mut self, height: f64) {
        self.config.height = height;
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.config.duration = duration_ms;
    }

    pub fn set_use_log_scale(&mut self, use_log_scale: bool) {
        self.config.use_log_scale = use_log_scale;
    }

    pub fn set_point_size(&mut self, point_size: f64) {
        self.config.point_size = point_size;
    }

    pub fn set_point_domain(&mut self, point_domain: Option<[f64; 2]>) {
        self.config.point_domain = point_domain;
    }

    pub fn set_x(&mut self, x: Accessor<P>) {
        self.accessors.x = x;
    }

    pub fn set_y(&mut self, y: Accessor<P>) {
        self.accessors.y = y;
    }

    pub fn set_color(&mut self, color: ColorScheme) {
        self.color = color;
    }

    #[must_use]
    pub fn color(&self) -> &ColorScheme {
        &self.color
    }

    #[must_use]
    pub fn x_scale(&self) -> ContinuousScale {
        self.x_scale
    }

    #[must_use]
    pub fn y_scale(&self) -> ContinuousScale {
        self.y_scale
    }

    /// Point marks drawn by the last render, in paint order.
    #[must_use]
    pub fn marks(&self) -> &[PointMark] {
        &self.marks
    }

    #[must_use]
    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn dispatch_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatch
    }

    pub fn subscribe(&mut self) -> Receiver<ChartEvent> {
        self.dispatch.subscribe()
    }

    /// Sets one option by its JSON name.
    pub fn set_option(&mut self, name: &str, value: Value) -> ChartResult<()> {
        match name {
            "id" => {
                let id = value
                    .as_u64()
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or_else(|| ChartError::invalid_option(name, "expected a u32"))?;
                self.id = id;
            }
            "color" => self.color = color_scheme_from_json(name, value)?,
            "x" | "y" => {
                return Err(ChartError::invalid_option(
                    name,
                    "accessors are functions; use the typed setter",
                ));
            }
            _ => {
                let Some(config) = with_field(&self.config, name, value)? else {
                    return Err(ChartError::UnknownOption(name.to_owned()));
                };
                config.validate()?;
                self.config = config;
            }
        }
        trace!(option = name, id = self.id, "scatter option set");
        Ok(())
    }

    /// Current JSON value of a plain-data option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            _ => field(&self.config, name),
        }
    }

    /// Recomputes the scales and draws one circle per finite point.
    ///
    /// Returns the keyed join of the series groups.
    pub fn render(&mut self, container: &mut Element, data: &[Series<P>]) -> ChartResult<KeyedJoin> {
        self.config.validate()?;
        self.update_scales(data);

        let visible: Vec<(usize, &Series<P>)> = visible_series(data).collect();
        let keys: Vec<&str> = visible.iter().map(|(_, s)| s.key.as_str()).collect();

        let wrap = container.ensure_child("g", "nvd3 nv-wrap nv-scatter");
        wrap.set_classes(&format!("nvd3 nv-wrap nv-scatter nv-chart-{}", self.id));
        let groups = wrap.ensure_child("g", "nv-groups");
        let join = groups.join_keyed("g", "nv-group", &keys);

        let radius = self.point_radius();
        let mut marks = Vec::new();
        let mut drawn = HashSet::new();
        for &(index, series) in &visible {
            if !drawn.insert(series.key.as_str()) {
                warn!(key = %series.key, "skipping series with duplicate key");
                continue;
            }
            let Some(group) = groups.keyed_child_mut("g", "nv-group", &series.key) else {
                continue;
            };
            let color = self
                .color
                .resolve(SeriesColorContext {
                    key: &series.key,
                    index,
                    explicit: series.color,
                })
                .to_css();
            group.set_classes(&format!("nv-group nv-series-{index}"));
            group.set_style("fill", color.clone());
            group.set_style("stroke", color);

            let points: Vec<(usize, f64, f64, f64, f64)> = series
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, point)| {
                    let x = (self.accessors.x)(point, i);
                    let y = (self.accessors.y)(point, i);
                    (x.is_finite() && y.is_finite()).then(|| {
                        let px = finite_or_zero(self.x_scale.map(x));
                        let py = finite_or_zero(self.y_scale.map(y));
                        (i, x, y, px, py)
                    })
                })
                .collect();
            let point_keys: Vec<String> = points.iter().map(|(i, ..)| i.to_string()).collect();
            let point_key_refs: Vec<&str> = point_keys.iter().map(String::as_str).collect();
            group.join_keyed("circle", "nv-point", &point_key_refs);

            for (&(i, x, y, px, py), key) in points.iter().zip(&point_keys) {
                let Some(circle) = group.keyed_child_mut("circle", "nv-point", key) else {
                    continue;
                };
                circle.set_classes(&format!("nv-point nv-point-{i}"));
                circle.set_attr("cx", num_text(px));
                circle.set_attr("cy", num_text(py));
                circle.set_attr("r", num_text(radius));
                marks.push(PointMark {
                    series_key: series.key.clone(),
                    series_index: index,
                    point_index: i,
                    x,
                    y,
                    pixel_x: px,
                    pixel_y: py,
                });
            }
        }

        self.marks = marks;
        if self.hovered_mark().is_none() {
            self.hover = HoverState::Idle;
        }
        debug!(
            id = self.id,
            series = visible.len(),
            points = self.marks.len(),
            duration_ms = self.config.duration,
            "scatter rendered"
        );
        Ok(join)
    }

    /// Hit-tests the pointer (plot-area pixels) and emits mouseout/mouseover
    /// when the hovered mark changes.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.config.interactive {
            return;
        }
        let hit = nearest_mark(&self.marks, x, y, self.config.hit_radius).cloned();
        let next = hit.as_ref().map_or(HoverState::Idle, |mark| HoverState::Over {
            series_index: mark.series_index,
            point_index: mark.point_index,
        });
        if next == self.hover {
            return;
        }

        if let Some(previous) = self.hovered_mark().cloned() {
            self.dispatch.emit(ChartEvent::ElementMouseout(previous));
        }
        self.hover = next;
        if let Some(mark) = hit {
            self.dispatch.emit(ChartEvent::ElementMouseover(mark));
        }
    }

    /// Emits `elementClick` for the mark under the pointer, if any.
    pub fn pointer_click(&mut self, x: f64, y: f64) -> Option<PointMark> {
        if !self.config.interactive {
            return None;
        }
        let mark = nearest_mark(&self.marks, x, y, self.config.hit_radius).cloned()?;
        self.dispatch.emit(ChartEvent::ElementClick(mark.clone()));
        Some(mark)
    }

    pub fn pointer_leave(&mut self) {
        if let Some(previous) = self.hovered_mark().cloned() {
            self.dispatch.emit(ChartEvent::ElementMouseout(previous));
        }
        self.hover = HoverState::Idle;
    }

    fn hovered_mark(&self) -> Option<&PointMark> {
        match self.hover {
            HoverState::Idle => None,
            HoverState::Over {
                series_index,
                point_index,
            } => self
                .marks
                .iter()
                .find(|mark| mark.id() == (series_index, point_index)),
        }
    }

    fn update_scales(&mut self, data: &[Series<P>]) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for (_, series) in visible_series(data) {
            for (i, point) in series.values.iter().enumerate() {
                xs.push((self.accessors.x)(point, i));
                ys.push((self.accessors.y)(point, i));
            }
        }

        let x_domain = widen_degenerate(match self.config.x_domain {
            Some([a, b]) => Some((a, b)),
            None => extent(xs.into_iter().chain(self.config.force_x.iter().copied())),
        });
        let y_domain = widen_degenerate(match self.config.y_domain {
            Some([a, b]) => Some((a, b)),
            None => extent(ys.into_iter().chain(self.config.force_y.iter().copied())),
        });

        self.x_scale = ContinuousScale::linear(x_domain, (0.0, self.config.width));
        let y_range = (self.config.height, 0.0);
        self.y_scale = if self.config.use_log_scale {
            ContinuousScale::log(y_domain, y_range)
        } else {
            ContinuousScale::linear(y_domain, y_range)
        };
        trace!(?x_domain, ?y_domain, log = self.config.use_log_scale, "scatter scales");
    }

    fn point_radius(&self) -> f64 {
        let size = self.config.point_size;
        let [d0, d1] = self.config.point_domain.unwrap_or([size, size]);
        let [r0, r1] = self.config.point_range;
        let area = ContinuousScale::linear((d0, d1), (r0, r1)).map(size);
        finite_or_zero((area.max(0.0) / PI).sqrt())
    }
}

impl<P> std::fmt::Debug for ScatterLayer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScatterLayer")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("x_scale", &self.x_scale)
            .field("y_scale", &self.y_scale)
            .field("marks", &self.marks.len())
            .finish_non_exhaustive()
    }
}

/// Min and max of the finite values, or `None` when there are none.
fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widens `[a, a]` by 1% each way, or to `[-1, 1]` for zero or no data.
fn widen_degenerate(domain: Option<(f64, f64)>) -> (f64, f64) {
    match domain {
        None => (-1.0, 1.0),
        Some((a, b)) if a == b => {
            if a == 0.0 {
                (-1.0, 1.0)
            } else {
                (a - a.abs() * 0.01, a + a.abs() * 0.01)
            }
        }
        Some(domain) => domain,
    }
}
