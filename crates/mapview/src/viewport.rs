use geo::{GeoBounds, GeoPoint};

use crate::renderer::RenderConfig;

/// What the renderer should do with the viewport after a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportPlan {
    /// Leave the prior viewport untouched.
    Keep,
    Center { center: GeoPoint, zoom: u8 },
    Fit { bounds: GeoBounds, padding_px: u32 },
}

/// Viewport rule over the valid points of the current marker set.
///
/// Zero points keep the prior viewport, or show the world default when
/// none was ever set. One point centers close on it. Two or more fit the
/// enclosing bounds, unless the bounds are degenerate (a repeated point),
/// which falls back to the world default.
pub fn plan_viewport(
    points: &[GeoPoint],
    config: &RenderConfig,
    viewport_ever_set: bool,
) -> ViewportPlan {
    let valid: Vec<GeoPoint> = points.iter().copied().filter(GeoPoint::is_valid).collect();
    match valid.as_slice() {
        [] => {
            if viewport_ever_set {
                ViewportPlan::Keep
            } else {
                ViewportPlan::Center {
                    center: config.world_center,
                    zoom: config.world_zoom,
                }
            }
        }
        [only] => ViewportPlan::Center {
            center: *only,
            zoom: config.focus_zoom,
        },
        _ => match GeoBounds::from_points(valid.iter()) {
            Some(bounds) if !bounds.is_degenerate() => ViewportPlan::Fit {
                bounds,
                padding_px: config.fit_padding_px,
            },
            _ => ViewportPlan::Center {
                center: config.world_center,
                zoom: config.world_zoom,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewportPlan, plan_viewport};
    use crate::renderer::RenderConfig;
    use geo::{FOCUS_ZOOM, GeoPoint, WORLD_DEFAULT_CENTER, WORLD_DEFAULT_ZOOM};

    fn config() -> RenderConfig {
        RenderConfig::default()
    }

    #[test]
    fn no_points_and_no_prior_viewport_shows_world_default() {
        let plan = plan_viewport(&[], &config(), false);
        assert_eq!(
            plan,
            ViewportPlan::Center {
                center: WORLD_DEFAULT_CENTER,
                zoom: WORLD_DEFAULT_ZOOM
            }
        );
    }

    #[test]
    fn no_points_with_prior_viewport_keeps_it() {
        assert_eq!(plan_viewport(&[], &config(), true), ViewportPlan::Keep);
    }

    #[test]
    fn single_point_centers_close() {
        let p = GeoPoint::new(12.97, 77.59);
        let plan = plan_viewport(&[p], &config(), true);
        assert_eq!(
            plan,
            ViewportPlan::Center {
                center: p,
                zoom: FOCUS_ZOOM
            }
        );
    }

    #[test]
    fn two_points_fit_the_enclosing_bounds() {
        let pts = [GeoPoint::new(28.6, 77.2), GeoPoint::new(19.0, 72.8)];
        let ViewportPlan::Fit { bounds, padding_px } = plan_viewport(&pts, &config(), true) else {
            panic!("expected a fit plan");
        };
        assert_eq!(bounds.south, 19.0);
        assert_eq!(bounds.west, 72.8);
        assert_eq!(bounds.north, 28.6);
        assert_eq!(bounds.east, 77.2);
        assert_eq!(padding_px, config().fit_padding_px);
    }

    #[test]
    fn repeated_point_falls_back_to_world_default() {
        let p = GeoPoint::new(12.97, 77.59);
        let plan = plan_viewport(&[p, p], &config(), true);
        assert_eq!(
            plan,
            ViewportPlan::Center {
                center: WORLD_DEFAULT_CENTER,
                zoom: WORLD_DEFAULT_ZOOM
            }
        );
    }

    #[test]
    fn invalid_points_are_ignored_for_planning() {
        let pts = [GeoPoint::new(f64::NAN, 0.0), GeoPoint::new(12.97, 77.59)];
        let plan = plan_viewport(&pts, &config(), true);
        assert!(matches!(plan, ViewportPlan::Center { center, .. } if center == pts[1]));
    }
}
