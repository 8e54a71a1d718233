//! Parameter resolution: validate and normalize compound and dosing input into
//! the canonical parameter set consumed by the simulator.
//!
//! Every default is declared in [`ResolverDefaults`]. Coercion failures are reported
//! as [`PharmsimError::InvalidNumericInput`]; an absent or zero half-life (or volume
//! of distribution) is reported as [`PharmsimError::MissingParameter`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::{
    coerce, parse_schedule, Bioavailability, CompoundParameters, DosingRegimen, Route, TimeUnit,
};
use crate::error::PharmsimError;

const BIOAVAILABILITY_PREFIX: &str = "bioavailability_";

/// Defaults applied by the resolver when a field is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverDefaults {
    /// Dose when none is given (default: 0)
    pub dose: f64,
    /// Dosing interval in hours (default: 24)
    pub interval: f64,
    /// Route of administration (default: oral)
    pub route: Route,
    /// Volume of distribution in liters (default: 70, adult total body water).
    /// `None` makes the volume a required input.
    pub volume_of_distribution: Option<f64>,
    /// Absorption rate constant in 1/h (default: 1)
    pub ka: f64,
    /// Bioavailability when neither the route nor oral is declared (default: 1)
    pub bioavailability: f64,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self {
            dose: 0.0,
            interval: 24.0,
            route: Route::Oral,
            volume_of_distribution: Some(70.0),
            ka: 1.0,
            bioavailability: 1.0,
        }
    }
}

/// Canonical, validated parameter set for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalParameters {
    /// Route of administration
    pub route: Route,
    /// Administered dose
    pub dose: f64,
    /// Resolved bioavailability for `route`
    pub bioavailability: f64,
    /// Dosing interval in hours
    pub interval: f64,
    /// Half-life in hours
    pub half_life: f64,
    /// Elimination rate constant, `ln(2) / half_life`
    pub k_elim: f64,
    /// Volume of distribution in liters
    pub volume_of_distribution: f64,
    /// Absorption rate constant (1/h)
    pub ka: f64,
}

impl CanonicalParameters {
    /// Dose reaching the systemic circulation, `dose × bioavailability`.
    pub fn actual_dose(&self) -> f64 {
        self.dose * self.bioavailability
    }
}

/// Resolves raw inputs into [`CanonicalParameters`].
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    defaults: ResolverDefaults,
}

impl Resolver {
    pub fn new(defaults: ResolverDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ResolverDefaults {
        &self.defaults
    }

    /// Resolve typed inputs.
    pub fn resolve(
        &self,
        compound: &CompoundParameters,
        regimen: &DosingRegimen,
    ) -> Result<CanonicalParameters, PharmsimError> {
        let d = &self.defaults;

        let dose = regimen.dose.unwrap_or(d.dose);
        if !dose.is_finite() || dose < 0.0 {
            return Err(PharmsimError::invalid_numeric("dose", dose));
        }

        let interval = regimen.interval.unwrap_or(d.interval);
        if !interval.is_finite() || interval <= 0.0 {
            return Err(PharmsimError::invalid_numeric("dosingSchedule", interval));
        }

        let route = regimen.route.clone().unwrap_or_else(|| d.route.clone());

        let bioavailability = compound
            .bioavailability
            .clone()
            .with_fallback(d.bioavailability)
            .resolve(&route);
        if !bioavailability.is_finite() || bioavailability < 0.0 {
            return Err(PharmsimError::invalid_numeric(
                format!("{BIOAVAILABILITY_PREFIX}{route}"),
                bioavailability,
            ));
        }

        let half_life = match compound.half_life {
            None => return Err(PharmsimError::missing("Half-life")),
            Some(h) if h == 0.0 => return Err(PharmsimError::missing("Half-life")),
            Some(h) if !h.is_finite() || h < 0.0 => {
                return Err(PharmsimError::invalid_numeric("half_life", h))
            }
            Some(h) => h,
        };

        // Both kinetic models divide by the volume, so it is checked for every route.
        let volume = compound.volume_of_distribution.or(d.volume_of_distribution);
        let volume_of_distribution = match volume {
            None => return Err(PharmsimError::missing("Volume of distribution")),
            Some(v) if v == 0.0 => return Err(PharmsimError::missing("Volume of distribution")),
            Some(v) if !v.is_finite() || v < 0.0 => {
                return Err(PharmsimError::invalid_numeric("volume_of_distribution", v))
            }
            Some(v) => v,
        };

        let ka = compound.ka.unwrap_or(d.ka);
        if !ka.is_finite() || ka <= 0.0 {
            return Err(PharmsimError::invalid_numeric("ka", ka));
        }

        let params = CanonicalParameters {
            route,
            dose,
            bioavailability,
            interval,
            half_life,
            k_elim: std::f64::consts::LN_2 / half_life,
            volume_of_distribution,
            ka,
        };
        tracing::debug!(?params, "resolved canonical parameters");
        Ok(params)
    }

    /// Resolve the loosely typed `compound` and `dosingInfo` objects of a request body.
    pub fn resolve_json(
        &self,
        compound: &Map<String, Value>,
        dosing: &Map<String, Value>,
    ) -> Result<CanonicalParameters, PharmsimError> {
        let regimen = regimen_from_json(dosing)?;
        let route = regimen.route.as_ref().unwrap_or(&self.defaults.route);
        let compound = compound_from_json(compound, route)?;
        self.resolve(&compound, &regimen)
    }
}

/// Resolve typed inputs with [`ResolverDefaults::default`].
pub fn resolve(
    compound: &CompoundParameters,
    regimen: &DosingRegimen,
) -> Result<CanonicalParameters, PharmsimError> {
    Resolver::default().resolve(compound, regimen)
}

/// Read a compound object for a dose given by `route`.
///
/// Recognized fields: `half_life` / `halfLife`, `half_life_unit` / `halfLifeUnit`,
/// `volume_of_distribution`, `ka`, and `bioavailability_<route>` keys. Only the
/// bioavailability entry selected for `route` (its own key, else the oral key) is
/// coerced; entries for other routes are ignored.
pub fn compound_from_json(
    fields: &Map<String, Value>,
    route: &Route,
) -> Result<CompoundParameters, PharmsimError> {
    let unit = match coerce::text(fields, "half_life_unit")?
        .or(coerce::text(fields, "halfLifeUnit")?)
    {
        Some(unit) => unit.parse::<TimeUnit>()?,
        None => TimeUnit::Hours,
    };

    let half_life =
        coerce::first_number(fields, &["half_life", "halfLife"])?.map(|h| unit.to_hours(h));

    let mut bioavailability = Bioavailability::new();
    for candidate in [route, &Route::Oral] {
        if let Some((key, value)) = declared_bioavailability(fields, candidate) {
            bioavailability.insert(candidate.clone(), coerce::to_number(key, value)?);
            break;
        }
    }

    Ok(CompoundParameters {
        half_life,
        volume_of_distribution: coerce::number(fields, "volume_of_distribution")?,
        ka: coerce::number(fields, "ka")?,
        bioavailability,
    })
}

/// The non-null `bioavailability_<token>` entry whose token names `route`.
fn declared_bioavailability<'a>(
    fields: &'a Map<String, Value>,
    route: &Route,
) -> Option<(&'a str, &'a Value)> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .find(|(key, _)| {
            key.strip_prefix(BIOAVAILABILITY_PREFIX)
                .is_some_and(|token| Route::parse(token) == *route)
        })
        .map(|(key, value)| (key.as_str(), value))
}

/// Read a `dosingInfo` object.
///
/// Recognized fields: `dose`, `dosingSchedule` (hours or a schedule label, see
/// [`parse_schedule`]) or its alias `dosingInterval`, and `route`.
pub fn regimen_from_json(fields: &Map<String, Value>) -> Result<DosingRegimen, PharmsimError> {
    let mut interval = None;
    for key in ["dosingSchedule", "dosingInterval"] {
        interval = match fields.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(label)) => Some(parse_schedule(label)?),
            Some(value) => Some(coerce::to_number(key, value)?),
        };
        break;
    }

    Ok(DosingRegimen {
        dose: coerce::number(fields, "dose")?,
        interval,
        route: coerce::text(fields, "route")?.map(|r| Route::parse(&r)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn resolve_json(compound: Value, dosing: Value) -> Result<CanonicalParameters, PharmsimError> {
        Resolver::default().resolve_json(&object(compound), &object(dosing))
    }

    #[test]
    fn applies_defaults() {
        let p = resolve_json(json!({"half_life": 6}), json!({})).unwrap();
        assert_eq!(p.dose, 0.0);
        assert_eq!(p.interval, 24.0);
        assert_eq!(p.route, Route::Oral);
        assert_eq!(p.volume_of_distribution, 70.0);
        assert_eq!(p.ka, 1.0);
        assert_eq!(p.bioavailability, 1.0);
        assert_relative_eq!(p.k_elim, std::f64::consts::LN_2 / 6.0);
    }

    #[test]
    fn accepts_both_half_life_spellings() {
        let a = resolve_json(json!({"half_life": 6}), json!({})).unwrap();
        let b = resolve_json(json!({"halfLife": "6"}), json!({})).unwrap();
        assert_eq!(a.k_elim, b.k_elim);
    }

    #[test]
    fn converts_half_life_units() {
        let p = resolve_json(json!({"halfLife": 360, "halfLifeUnit": "minutes"}), json!({}))
            .unwrap();
        assert_relative_eq!(p.half_life, 6.0);
        let err =
            resolve_json(json!({"halfLife": 6, "halfLifeUnit": "weeks"}), json!({})).unwrap_err();
        assert!(matches!(err, PharmsimError::UnknownUnit { .. }));
    }

    #[test]
    fn missing_or_zero_half_life() {
        for compound in [json!({}), json!({"half_life": 0}), json!({"half_life": null})] {
            let err = resolve_json(compound, json!({"dose": 100})).unwrap_err();
            assert!(matches!(err, PharmsimError::MissingParameter { .. }));
            assert!(err.to_string().contains("Half-life"));
        }
    }

    #[test]
    fn zero_volume_is_missing_for_every_route() {
        for route in ["iv", "oral"] {
            let err = resolve_json(
                json!({"half_life": 6, "volume_of_distribution": 0}),
                json!({"route": route}),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                PharmsimError::MissingParameter { ref parameter }
                    if parameter == "Volume of distribution"
            ));
        }
    }

    #[test]
    fn volume_required_without_default() {
        let resolver = Resolver::new(ResolverDefaults {
            volume_of_distribution: None,
            ..Default::default()
        });
        let err = resolver
            .resolve(&CompoundParameters::new().half_life(6.0), &DosingRegimen::new())
            .unwrap_err();
        assert!(matches!(err, PharmsimError::MissingParameter { .. }));
    }

    #[test]
    fn bioavailability_fallback_chain() {
        let compound = json!({
            "half_life": 6,
            "bioavailability_oral": 0.6,
            "bioavailability_im": 0.9
        });
        let im = resolve_json(compound.clone(), json!({"route": "IM", "dose": 100})).unwrap();
        assert_eq!(im.bioavailability, 0.9);
        assert_relative_eq!(im.actual_dose(), 90.0);

        let sc = resolve_json(compound, json!({"route": "subcutaneous", "dose": 100})).unwrap();
        assert_eq!(sc.bioavailability, 0.6);
        assert_relative_eq!(sc.actual_dose(), 60.0);

        let none = resolve_json(json!({"half_life": 6}), json!({"route": "rectal"})).unwrap();
        assert_eq!(none.bioavailability, 1.0);
    }

    #[test]
    fn only_the_selected_bioavailability_is_coerced() {
        let compound = json!({
            "half_life": 6,
            "bioavailability_im": "n/a",
            "bioavailability_oral": 0.5
        });
        let oral = resolve_json(compound.clone(), json!({"route": "oral", "dose": 100})).unwrap();
        assert_eq!(oral.bioavailability, 0.5);
        let sc = resolve_json(compound.clone(), json!({"route": "sc", "dose": 100})).unwrap();
        assert_eq!(sc.bioavailability, 0.5);

        let err = resolve_json(compound, json!({"route": "im"})).unwrap_err();
        assert!(matches!(
            err,
            PharmsimError::InvalidNumericInput { ref field, .. } if field == "bioavailability_im"
        ));
    }

    #[test]
    fn malformed_oral_entry_is_ignored_when_route_is_declared() {
        let compound = json!({
            "half_life": 6,
            "bioavailability_im": 0.8,
            "bioavailability_oral": "unknown"
        });
        let p = resolve_json(compound, json!({"route": "IM", "dose": 100})).unwrap();
        assert_relative_eq!(p.actual_dose(), 80.0);
    }

    #[test]
    fn route_is_case_normalized() {
        let p = resolve_json(json!({"half_life": 6}), json!({"route": "IV"})).unwrap();
        assert_eq!(p.route, Route::Iv);
    }

    #[test]
    fn schedule_labels_and_aliases() {
        let p = resolve_json(
            json!({"half_life": 6}),
            json!({"dosingSchedule": "2 times a day"}),
        )
        .unwrap();
        assert_eq!(p.interval, 12.0);
        let p = resolve_json(json!({"half_life": 6}), json!({"dosingSchedule": 8})).unwrap();
        assert_eq!(p.interval, 8.0);
        let p = resolve_json(json!({"half_life": 6}), json!({"dosingInterval": "6"})).unwrap();
        assert_eq!(p.interval, 6.0);
    }

    #[test]
    fn rejects_invalid_numbers() {
        let cases = [
            (json!({"half_life": "six"}), json!({})),
            (json!({"half_life": 6}), json!({"dose": "lots"})),
            (json!({"half_life": 6}), json!({"dose": -5})),
            (json!({"half_life": 6}), json!({"dosingSchedule": 0})),
            (json!({"half_life": -6}), json!({})),
            (json!({"half_life": 6, "ka": 0}), json!({})),
            (json!({"half_life": 6, "volume_of_distribution": [70]}), json!({})),
            (json!({"half_life": 6, "bioavailability_oral": "high"}), json!({})),
        ];
        for (compound, dosing) in cases {
            let err = resolve_json(compound.clone(), dosing.clone()).unwrap_err();
            assert!(
                matches!(err, PharmsimError::InvalidNumericInput { .. }),
                "{compound} / {dosing} gave {err:?}"
            );
        }
    }

    #[test]
    fn typed_resolution() {
        let compound = CompoundParameters::new()
            .half_life(6.0)
            .volume_of_distribution(50.0)
            .bioavailability(Bioavailability::new().with(Route::Oral, 0.5));
        let regimen = DosingRegimen::new().dose(500.0).interval(12.0).route(Route::Oral);
        let p = resolve(&compound, &regimen).unwrap();
        assert_relative_eq!(p.actual_dose(), 250.0);
        assert_eq!(p.volume_of_distribution, 50.0);
    }
}
