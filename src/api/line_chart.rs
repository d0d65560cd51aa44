use std::collections::HashSet;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::mpsc::Receiver;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::curve::num_text;
use crate::core::{
    Accessor, Accessors, ColorScheme, ContinuousScale, Coordinates, DefinedFn, Interpolation,
    LinePathGenerator, MarginUpdate, PlotArea, Point, Series, SeriesColorContext, visible_series,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::PointMark;
use crate::render::{Element, KeyedJoin, Transition, TransitionTarget};

use super::config::LineChartConfig;
use super::dispatch::{ChartEvent, Dispatcher, EventKind};
use super::options::{color_scheme_from_json, entries, field, with_field};
use super::scatter::ScatterLayer;

/// Opacity an entering series starts from before settling.
const ENTER_OPACITY: &str = "1e-6";

/// Fill opacity for series that do not set one.
const DEFAULT_FILL_OPACITY: f64 = 0.5;

/// What one render pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Attribute and style changes a host may animate; the scene already
    /// holds every `to` value.
    pub transitions: Vec<Transition>,
}

/// Multi-series line chart drawn over a scatter layer.
///
/// The scatter layer owns the scales and point marks; the chart sizes it,
/// reads its scales back and draws one interpolated path per series. Scales
/// of the previous render are kept so that new lines can start from where
/// the old scales would have put them.
pub struct LineChart<P = Point> {
    config: LineChartConfig,
    accessors: Accessors<P>,
    color: ColorScheme,
    scatter: ScatterLayer<P>,
    dispatch: Dispatcher,
    scatter_events: Receiver<ChartEvent>,
    x0: Option<ContinuousScale>,
    y0: Option<ContinuousScale>,
}

impl<P: Coordinates + 'static> LineChart<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_accessors(Accessors::default())
    }
}

impl<P: Coordinates + 'static> Default for LineChart<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> LineChart<P> {
    pub fn with_accessors(accessors: Accessors<P>) -> Self {
        let config = LineChartConfig::default();
        let mut scatter = ScatterLayer::with_accessors(accessors.clone());
        scatter.set_point_size(16.0);
        scatter.set_point_domain(Some([16.0, 256.0]));
        scatter.set_use_log_scale(config.use_log_scale);
        scatter.set_duration(config.duration);
        let scatter_events = scatter.subscribe();

        Self {
            config,
            accessors,
            color: ColorScheme::default(),
            scatter,
            dispatch: Dispatcher::new(&[
                EventKind::ElementClick,
                EventKind::ElementMouseover,
                EventKind::ElementMouseout,
                EventKind::RenderEnd,
            ]),
            scatter_events,
            x0: None,
            y0: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> LineChartConfig {
        self.config
    }

    /// Replaces the whole configuration and pushes the shared fields into
    /// the scatter layer.
    pub fn set_config(&mut self, config: LineChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        self.scatter.set_duration(config.duration);
        self.scatter.set_use_log_scale(config.use_log_scale);
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) {
        self.config.width = width;
    }

    pub fn set_height(&mut self, height: f64) {
        self.config.height = height;
    }

    pub fn set_margin(&mut self, update: MarginUpdate) {
        self.config.margin.merge(update);
    }

    pub fn set_x(&mut self, x: Accessor<P>) {
        self.scatter.set_x(x.clone());
        self.accessors.x = x;
    }

    pub fn set_y(&mut self, y: Accessor<P>) {
        self.scatter.set_y(y.clone());
        self.accessors.y = y;
    }

    /// `None` restores the default: a point is defined when y is not NaN.
    pub fn set_defined(&mut self, defined: Option<DefinedFn<P>>) {
        self.accessors.defined = defined;
    }

    pub fn set_color(&mut self, color: ColorScheme) {
        self.scatter.set_color(color.clone());
        self.color = color;
    }

    pub fn set_interpolate(&mut self, interpolate: Interpolation) {
        self.config.interpolate = interpolate;
    }

    pub fn set_clip_edge(&mut self, clip_edge: bool) {
        self.config.clip_edge = clip_edge;
    }

    pub fn set_stroke_width(&mut self, stroke_width: f64) {
        self.config.stroke_width = stroke_width;
    }

    pub fn set_duration(&mut self, duration_ms: u64) {
        self.config.duration = duration_ms;
        self.scatter.set_duration(duration_ms);
    }

    pub fn set_use_log_scale(&mut self, use_log_scale: bool) {
        self.config.use_log_scale = use_log_scale;
        self.scatter.set_use_log_scale(use_log_scale);
    }

    #[must_use]
    pub fn accessors(&self) -> &Accessors<P> {
        &self.accessors
    }

    #[must_use]
    pub fn color(&self) -> &ColorScheme {
        &self.color
    }

    #[must_use]
    pub fn scatter(&self) -> &ScatterLayer<P> {
        &self.scatter
    }

    /// Mutable access to the scatter layer. Events it emits meanwhile reach
    /// the chart dispatcher when the returned guard is dropped.
    pub fn scatter_mut(&mut self) -> ScatterMut<'_, P> {
        self.relay_scatter_events();
        ScatterMut { chart: self }
    }

    /// Scales captured at the end of the last render.
    #[must_use]
    pub fn previous_scales(&self) -> Option<(ContinuousScale, ContinuousScale)> {
        self.x0.zip(self.y0)
    }

    pub fn dispatch_mut(&mut self) -> &mut Dispatcher {
        self.relay_scatter_events();
        &mut self.dispatch
    }

    /// Registers a handler for `typename` (`"elementClick"`, `"renderEnd.log"`, ...).
    pub fn on<F>(&mut self, typename: &str, handler: F) -> ChartResult<()>
    where
        F: FnMut(&ChartEvent) + Send + 'static,
    {
        self.relay_scatter_events();
        self.dispatch.on(typename, handler)
    }

    pub fn subscribe(&mut self) -> Receiver<ChartEvent> {
        self.relay_scatter_events();
        self.dispatch.subscribe()
    }

    /// Sets one option by its JSON name.
    ///
    /// Names the chart does not own are forwarded to the scatter layer, which
    /// reports names it does not know either as `UnknownOption`.
    pub fn set_option(&mut self, name: &str, value: Value) -> ChartResult<()> {
        match name {
            "margin" => {
                let update: MarginUpdate = serde_json::from_value(value)
                    .map_err(|e| ChartError::invalid_option(name, e.to_string()))?;
                let mut config = self.config;
                config.margin.merge(update);
                config.validate()?;
                self.config = config;
            }
            "color" => {
                let scheme = color_scheme_from_json(name, value)?;
                self.set_color(scheme);
            }
            "x" | "y" | "defined" => {
                return Err(ChartError::invalid_option(
                    name,
                    "accessors are functions; use the typed setter",
                ));
            }
            _ => match with_field(&self.config, name, value.clone())? {
                Some(config) => self.set_config(config)?,
                None => {
                    trace!(option = name, "forwarding option to scatter layer");
                    self.scatter.set_option(name, value)?;
                }
            },
        }
        Ok(())
    }

    /// Applies every entry of a JSON object in document order.
    pub fn options(&mut self, options: Value) -> ChartResult<()> {
        for (name, value) in entries(options)? {
            self.set_option(&name, value)?;
        }
        Ok(())
    }

    /// Current JSON value of a plain-data option, looking at the scatter
    /// layer for names the chart does not own.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<Value> {
        field(&self.config, name).or_else(|| self.scatter.option(name))
    }

    /// Republishes queued scatter events on the chart dispatcher.
    ///
    /// Every chart entry point that can observe or emit events calls this
    /// first, so chart subscribers see scatter events in emission order.
    pub fn relay_scatter_events(&mut self) -> usize {
        let mut relayed = 0;
        while let Ok(event) = self.scatter_events.try_recv() {
            self.dispatch.emit(event);
            relayed += 1;
        }
        relayed
    }

    /// Pointer moved to `(x, y)` in container pixels.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let margin = self.config.margin;
        self.scatter.pointer_move(x - margin.left, y - margin.top);
        self.relay_scatter_events();
    }

    /// Click at `(x, y)` in container pixels; returns the clicked mark.
    pub fn pointer_click(&mut self, x: f64, y: f64) -> Option<PointMark> {
        let margin = self.config.margin;
        let mark = self.scatter.pointer_click(x - margin.left, y - margin.top);
        self.relay_scatter_events();
        mark
    }

    pub fn pointer_leave(&mut self) {
        self.scatter.pointer_leave();
        self.relay_scatter_events();
    }
}

impl<P: Sync> LineChart<P> {
    /// Renders `data` into `container`.
    ///
    /// The chart's wrapper is created on first use and found again on later
    /// calls, so rendering the same data twice leaves the scene unchanged.
    pub fn render(&mut self, container: &mut Element, data: &[Series<P>]) -> ChartResult<RenderReport> {
        self.relay_scatter_events();
        self.config.validate()?;
        let margin = self.config.margin;
        let area = PlotArea::from_outer(self.config.width, self.config.height, margin);
        container.toggle_class("nvd3-svg", true);

        let wrap = container.ensure_child("g", "nvd3 nv-wrap nv-line");
        wrap.set_attr(
            "transform",
            format!("translate({},{})", num_text(margin.left), num_text(margin.top)),
        );
        wrap.ensure_child("defs", "");
        let inner = wrap.ensure_child("g", "");
        inner.ensure_child("g", "nv-groups");
        let scatter_wrap = inner.ensure_child("g", "nv-scatterWrap");

        self.scatter.set_width(area.width);
        self.scatter.set_height(area.height);
        self.scatter.render(scatter_wrap, data)?;

        let x = self.scatter.x_scale();
        let y = self.scatter.y_scale();
        let x0 = *self.x0.get_or_insert(x);
        let y0 = *self.y0.get_or_insert(y);

        let clip_id = format!("nv-edge-clip-{}", self.scatter.id());
        let (clip_width, clip_height) = area.clip_size();
        let clip = wrap.ensure_child("defs", "").ensure_child("clipPath", "");
        clip.set_attr("id", clip_id.as_str());
        let rect = clip.ensure_child("rect", "");
        rect.set_attr("width", num_text(clip_width));
        rect.set_attr("height", num_text(clip_height));

        let clip_ref = self.config.clip_edge.then(|| format!("url(#{clip_id})"));
        let inner = wrap.ensure_child("g", "");
        inner.set_or_remove_attr("clip-path", clip_ref.clone());
        inner
            .ensure_child("g", "nv-scatterWrap")
            .set_or_remove_attr("clip-path", clip_ref);

        let visible: Vec<(usize, &Series<P>)> = visible_series(data).collect();
        let keys: Vec<&str> = visible.iter().map(|(_, s)| s.key.as_str()).collect();
        let groups = inner.ensure_child("g", "nv-groups");
        let join = groups.join_keyed("g", "nv-group", &keys);
        let paths = self.project_paths(&visible, &join, (x, y), (x0, y0));

        let duration_ms = self.config.duration;
        let mut transitions = Vec::new();
        let mut drawn = HashSet::new();
        for (&(index, series), (old_d, new_d)) in visible.iter().zip(paths) {
            if !drawn.insert(series.key.as_str()) {
                warn!(key = %series.key, "skipping series with duplicate key");
                continue;
            }
            let Some(group) = groups.keyed_child_mut("g", "nv-group", &series.key) else {
                continue;
            };
            let entered = join.is_entered(&series.key);
            let fill_opacity = series.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY);
            let style_transition = |name: &str, to: String| Transition {
                key: series.key.clone(),
                target: TransitionTarget::Style(name.to_owned()),
                from: ENTER_OPACITY.to_owned(),
                to,
                duration_ms,
            };

            if entered {
                let stroke_width = series.stroke_width.unwrap_or(self.config.stroke_width);
                group.set_style("stroke-width", num_text(stroke_width));
                transitions.push(style_transition("stroke-opacity", "1".to_owned()));
                transitions.push(style_transition("fill-opacity", num_text(fill_opacity)));
            }

            let classes = match series.classed.as_deref() {
                Some(classed) => format!("{classed} nv-group nv-series-{index}"),
                None => format!("nv-group nv-series-{index}"),
            };
            group.set_classes(&classes);
            group.toggle_class("hover", series.hover);

            let color = self
                .color
                .resolve(SeriesColorContext {
                    key: &series.key,
                    index,
                    explicit: series.color,
                })
                .to_css();
            group.set_style("fill", color.clone());
            group.set_style("stroke", color);
            group.set_style("stroke-opacity", "1");
            group.set_style("fill-opacity", num_text(fill_opacity));

            let path = group.ensure_child("path", "nv-line");
            let from = match path.attr("d") {
                Some(current) => current.to_owned(),
                None => old_d.unwrap_or_default(),
            };
            path.set_or_remove_attr("d", new_d.clone());
            transitions.push(Transition {
                key: series.key.clone(),
                target: TransitionTarget::Attribute("d".to_owned()),
                from,
                to: new_d.unwrap_or_default(),
                duration_ms,
            });
        }

        self.x0 = Some(x);
        self.y0 = Some(y);

        debug!(
            scatter_id = self.scatter.id(),
            series = visible.len(),
            entered = join.entered.len(),
            updated = join.updated.len(),
            removed = join.removed.len(),
            transitions = transitions.len(),
            interpolate = %self.config.interpolate,
            clip_edge = self.config.clip_edge,
            "line chart rendered"
        );
        self.relay_scatter_events();
        self.dispatch.emit(ChartEvent::RenderEnd);

        Ok(RenderReport {
            entered: join.entered,
            updated: join.updated,
            removed: join.removed,
            transitions,
        })
    }

    /// Path data per visible series: `(previous-scale d for entering
    /// series, current-scale d)`.
    fn project_paths(
        &self,
        visible: &[(usize, &Series<P>)],
        join: &KeyedJoin,
        (x, y): (ContinuousScale, ContinuousScale),
        (x0, y0): (ContinuousScale, ContinuousScale),
    ) -> Vec<(Option<String>, Option<String>)> {
        let current = LinePathGenerator::new(&self.accessors, x, y)
            .with_interpolation(self.config.interpolate);
        let previous = LinePathGenerator::new(&self.accessors, x0, y0)
            .with_interpolation(self.config.interpolate);
        let project = |(_, series): &(usize, &Series<P>)| {
            let old = if join.is_entered(&series.key) {
                previous.path(&series.values)
            } else {
                None
            };
            (old, current.path(&series.values))
        };

        #[cfg(feature = "parallel-projection")]
        {
            visible.par_iter().map(project).collect()
        }

        #[cfg(not(feature = "parallel-projection"))]
        {
            visible.iter().map(project).collect()
        }
    }
}

/// Guard returned by [`LineChart::scatter_mut`].
pub struct ScatterMut<'a, P> {
    chart: &'a mut LineChart<P>,
}

impl<P> Deref for ScatterMut<'_, P> {
    type Target = ScatterLayer<P>;

    fn deref(&self) -> &ScatterLayer<P> {
        &self.chart.scatter
    }
}

impl<P> DerefMut for ScatterMut<'_, P> {
    fn deref_mut(&mut self) -> &mut ScatterLayer<P> {
        &mut self.chart.scatter
    }
}

impl<P> Drop for ScatterMut<'_, P> {
    fn drop(&mut self) {
        self.chart.relay_scatter_events();
    }
}

impl<P> fmt::Debug for ScatterMut<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScatterMut").field(&self.chart.scatter).finish()
    }
}

impl<P> fmt::Debug for LineChart<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineChart")
            .field("config", &self.config)
            .field("accessors", &self.accessors)
            .field("color", &self.color)
            .field("scatter", &self.scatter)
            .field("dispatch", &self.dispatch)
            .field("x0", &self.x0)
            .field("y0", &self.y0)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::LineChart;
    use crate::core::{Point, Series};
    use crate::error::ChartError;
    use crate::render::{Element, TransitionTarget};

    fn line(key: &str, values: &[(f64, f64)]) -> Series<Point> {
        Series::new(key, values.iter().copied().map(Point::from).collect())
    }

    #[test]
    fn first_render_seeds_previous_scales() {
        let mut chart = LineChart::<Point>::new();
        assert!(chart.previous_scales().is_none());

        let mut svg = Element::svg(960.0, 500.0);
        let report = chart
            .render(&mut svg, &[line("a", &[(0.0, 0.0), (1.0, 1.0)])])
            .expect("render");
        let (x0, _) = chart.previous_scales().expect("scales");
        assert_eq!(x0, chart.scatter().x_scale());
        assert_eq!(report.entered, vec!["a".to_owned()]);
        let d = report
            .transitions
            .iter()
            .find(|t| t.target == TransitionTarget::Attribute("d".to_owned()))
            .expect("path transition");
        assert_eq!(d.from, d.to);
    }

    #[test]
    fn entering_groups_get_opacity_transitions() {
        let mut chart = LineChart::<Point>::new();
        let mut svg = Element::svg(960.0, 500.0);
        let data = [line("a", &[(0.0, 0.0), (1.0, 1.0)]).with_fill_opacity(0.25)];
        let report = chart.render(&mut svg, &data).expect("render");

        let styles: Vec<(&str, &str)> = report
            .transitions
            .iter()
            .filter_map(|t| match &t.target {
                TransitionTarget::Style(name) => Some((name.as_str(), t.to.as_str())),
                TransitionTarget::Attribute(_) => None,
            })
            .collect();
        assert_eq!(styles, vec![("stroke-opacity", "1"), ("fill-opacity", "0.25")]);

        let again = chart.render(&mut svg, &data).expect("render");
        assert!(again
            .transitions
            .iter()
            .all(|t| matches!(t.target, TransitionTarget::Attribute(_))));
    }

    #[test]
    fn unowned_options_go_to_scatter() {
        let mut chart = LineChart::<Point>::new();
        chart
            .options(json!({"pointSize": 4.0, "clipEdge": true, "margin": {"left": 30}}))
            .expect("options");
        assert_eq!(chart.scatter().config().point_size, 4.0);
        assert!(chart.config().clip_edge);
        assert_eq!(chart.config().margin.left, 30.0);
        assert_eq!(chart.option("pointSize"), Some(json!(4.0)));

        assert!(matches!(
            chart.set_option("nonsense", json!(true)),
            Err(ChartError::UnknownOption(name)) if name == "nonsense"
        ));
    }

    #[test]
    fn duration_and_log_scale_reach_scatter() {
        let mut chart = LineChart::<Point>::new();
        chart.set_duration(0);
        chart.set_option("useLogScale", json!(true)).expect("option");
        assert_eq!(chart.scatter().config().duration, 0);
        assert!(chart.scatter().config().use_log_scale);
        assert_eq!(chart.scatter().config().point_domain, Some([16.0, 256.0]));
    }
}
