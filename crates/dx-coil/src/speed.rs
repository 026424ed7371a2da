//! Speed record: one discrete compressor/fan speed of an operating mode.

use crate::error::{CoilError, CoilResult};
use crate::split;
use dx_core::CurveId;
use dx_core::units::{MassRate, Power, VolumeRate, constants, kgps};
use dx_curves::{CurveError, CurveSet};
use std::fmt;

/// What a performance curve modifies; fixes how many variables it is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveRole {
    /// Capacity vs (entering wet-bulb, condenser entering temperature).
    CapFT,
    /// Capacity vs evaporator air flow fraction.
    CapFF,
    /// EIR vs (entering wet-bulb, condenser entering temperature).
    EirFT,
    /// EIR vs evaporator air flow fraction.
    EirFF,
    /// Part-load fraction vs part-load ratio.
    Plf,
    /// SHR vs (entering wet-bulb, entering dry-bulb).
    ShrFT,
    /// SHR vs evaporator air flow fraction.
    ShrFF,
    /// Waste heat vs (condenser entering dry-bulb, entering dry-bulb).
    WasteHeatFT,
}

impl CurveRole {
    pub const ALL: [CurveRole; 8] = [
        CurveRole::CapFT,
        CurveRole::CapFF,
        CurveRole::EirFT,
        CurveRole::EirFF,
        CurveRole::Plf,
        CurveRole::ShrFT,
        CurveRole::ShrFF,
        CurveRole::WasteHeatFT,
    ];

    /// Number of independent variables the engine passes for this role.
    pub fn arity(self) -> usize {
        match self {
            CurveRole::CapFT | CurveRole::EirFT | CurveRole::ShrFT | CurveRole::WasteHeatFT => 2,
            CurveRole::CapFF | CurveRole::EirFF | CurveRole::Plf | CurveRole::ShrFF => 1,
        }
    }
}

impl fmt::Display for CurveRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CurveRole::CapFT => "CapFT",
            CurveRole::CapFF => "CapFF",
            CurveRole::EirFT => "EIRFT",
            CurveRole::EirFF => "EIRFF",
            CurveRole::Plf => "PLF",
            CurveRole::ShrFT => "SHRFT",
            CurveRole::ShrFF => "SHRFF",
            CurveRole::WasteHeatFT => "WasteHeatFT",
        };
        f.write_str(s)
    }
}

/// Curve references of a speed. Absent curves act as a multiplier of 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedCurves {
    pub cap_ft: Option<CurveId>,
    pub cap_ff: Option<CurveId>,
    pub eir_ft: Option<CurveId>,
    pub eir_ff: Option<CurveId>,
    pub plf: Option<CurveId>,
    pub shr_ft: Option<CurveId>,
    pub shr_ff: Option<CurveId>,
    pub waste_heat_ft: Option<CurveId>,
}

impl SpeedCurves {
    pub fn get(&self, role: CurveRole) -> Option<CurveId> {
        match role {
            CurveRole::CapFT => self.cap_ft,
            CurveRole::CapFF => self.cap_ff,
            CurveRole::EirFT => self.eir_ft,
            CurveRole::EirFF => self.eir_ff,
            CurveRole::Plf => self.plf,
            CurveRole::ShrFT => self.shr_ft,
            CurveRole::ShrFF => self.shr_ff,
            CurveRole::WasteHeatFT => self.waste_heat_ft,
        }
    }

    /// SHR comes from curves rather than the bypass-factor method.
    pub fn has_shr_curves(&self) -> bool {
        self.shr_ft.is_some() || self.shr_ff.is_some()
    }
}

/// How the rated bypass factor of a speed is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BypassFactorInput {
    /// Derive from rated capacity, rated SHR and rated air flow at rating conditions.
    #[default]
    FromRatedShr,
    /// Given directly, in (0, 1).
    Rated(f64),
    /// Apparatus dew point state; the bypass factor follows at rating conditions.
    ApparatusDewPoint {
        temperature_c: f64,
        humidity_ratio: f64,
    },
}

/// Input parameters for one speed, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSpec {
    pub name: String,
    /// Nominal-to-rated capacity ratio: share of the mode's rated capacity.
    pub total_capacity_fraction: f64,
    /// Share of the mode's rated evaporator air flow.
    pub evap_air_flow_fraction: f64,
    /// Share of the mode's rated condenser air flow.
    pub condenser_air_flow_fraction: f64,
    /// Gross SHR at rating conditions; `None` inherits the mode's rated SHR.
    pub rated_shr: Option<f64>,
    /// Gross COP at rating conditions.
    pub rated_cop: f64,
    /// Share of the mode's nominal evaporative condenser pump power.
    pub evap_condenser_pump_power_fraction: f64,
    /// Share of collected condensate reused as evaporative condenser make-up.
    pub condensate_reuse_fraction: f64,
    pub bypass: BypassFactorInput,
    pub curves: SpeedCurves,
    /// Recoverable waste heat as a fraction of electric input at rating conditions.
    pub waste_heat_fraction: f64,
}

impl SpeedSpec {
    /// A speed at full mode capacity and flow, no curves, rated COP `cop`.
    pub fn new(name: impl Into<String>, rated_cop: f64) -> Self {
        Self {
            name: name.into(),
            total_capacity_fraction: 1.0,
            evap_air_flow_fraction: 1.0,
            condenser_air_flow_fraction: 1.0,
            rated_shr: None,
            rated_cop,
            evap_condenser_pump_power_fraction: 1.0,
            condensate_reuse_fraction: 0.0,
            bypass: BypassFactorInput::default(),
            curves: SpeedCurves::default(),
            waste_heat_fraction: 0.0,
        }
    }
}

/// Mode-level ratings a speed is scaled from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ModeRating<'a> {
    pub name: &'a str,
    pub total_capacity: Power,
    pub evap_air_flow: VolumeRate,
    pub shr: f64,
}

/// Rated quantities derived when the speed is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRating {
    pub total_capacity: Power,
    pub air_mass_flow: MassRate,
    pub shr: f64,
    pub eir: f64,
    pub bypass_factor: f64,
    /// `A0 = -ln(BF_rated) · ṁ_rated`, so that `BF = exp(-A0 / ṁ)` at any flow.
    pub bypass_ntu_coefficient: f64,
}

/// Validated, immutable speed record.
#[derive(Debug, Clone, PartialEq)]
pub struct Speed {
    name: String,
    spec: SpeedSpec,
    rating: SpeedRating,
}

impl Speed {
    pub(crate) fn build(spec: SpeedSpec, mode: ModeRating<'_>, curves: &CurveSet) -> CoilResult<Self> {
        let name = spec.name.to_uppercase();
        let invalid = |what| CoilError::InvalidRecord {
            name: name.clone(),
            what,
        };

        if name.trim().is_empty() {
            return Err(invalid("speed name must not be empty"));
        }
        if !(spec.total_capacity_fraction > 0.0 && spec.total_capacity_fraction.is_finite()) {
            return Err(invalid("total capacity fraction must be positive"));
        }
        if !(spec.evap_air_flow_fraction > 0.0 && spec.evap_air_flow_fraction.is_finite()) {
            return Err(invalid("evaporator air flow fraction must be positive"));
        }
        if !(spec.condenser_air_flow_fraction >= 0.0 && spec.condenser_air_flow_fraction.is_finite()) {
            return Err(invalid("condenser air flow fraction must be non-negative"));
        }
        if !(spec.rated_cop > 0.0 && spec.rated_cop.is_finite()) {
            return Err(invalid("rated COP must be positive"));
        }
        if !(spec.evap_condenser_pump_power_fraction >= 0.0
            && spec.evap_condenser_pump_power_fraction.is_finite())
        {
            return Err(invalid("pump power fraction must be non-negative"));
        }
        if !(0.0..=1.0).contains(&spec.condensate_reuse_fraction) {
            return Err(invalid("condensate reuse fraction must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&spec.waste_heat_fraction) {
            return Err(invalid("waste heat fraction must be in [0, 1]"));
        }
        let shr = spec.rated_shr.unwrap_or(mode.shr);
        if !(shr > 0.0 && shr <= 1.0) {
            return Err(invalid("rated SHR must be in (0, 1]"));
        }

        for role in CurveRole::ALL {
            if let Some(id) = spec.curves.get(role) {
                check_curve_arity(curves, id, role, &name)?;
            }
        }

        let total_capacity = mode.total_capacity * spec.total_capacity_fraction;
        let air_mass_flow = kgps(
            mode.evap_air_flow.value * spec.evap_air_flow_fraction * rated_air_density(),
        );

        let bypass_factor = match spec.bypass {
            BypassFactorInput::Rated(bf) => bf,
            BypassFactorInput::FromRatedShr => {
                split::rated_bypass_factor(total_capacity.value, air_mass_flow.value, shr)
                    .map_err(|_| {
                        invalid("rated SHR, capacity and air flow give no apparatus dew point")
                    })?
            }
            BypassFactorInput::ApparatusDewPoint {
                temperature_c,
                humidity_ratio,
            } => split::bypass_factor_from_adp(
                total_capacity.value,
                air_mass_flow.value,
                temperature_c,
                humidity_ratio,
            )
            .map_err(|_| invalid("apparatus dew point inconsistent with rated capacity"))?,
        };
        if !(bypass_factor > 0.0 && bypass_factor < 1.0) {
            return Err(invalid("bypass factor must be in (0, 1)"));
        }

        let rating = SpeedRating {
            total_capacity,
            air_mass_flow,
            shr,
            eir: 1.0 / spec.rated_cop,
            bypass_factor,
            bypass_ntu_coefficient: -bypass_factor.ln() * air_mass_flow.value,
        };

        tracing::debug!(
            mode = mode.name,
            speed = %name,
            capacity_w = total_capacity.value,
            bypass_factor,
            "speed rated"
        );

        Ok(Self { name, spec, rating })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &SpeedSpec {
        &self.spec
    }

    pub fn rating(&self) -> &SpeedRating {
        &self.rating
    }

    pub fn curves(&self) -> &SpeedCurves {
        &self.spec.curves
    }

    /// Rated gross total cooling capacity.
    pub fn rated_total_capacity(&self) -> Power {
        self.rating.total_capacity
    }

    /// Bypass factor at an actual evaporator air mass flow [kg/s].
    pub fn bypass_factor_at(&self, mdot: f64) -> f64 {
        if mdot <= 0.0 {
            return 0.0;
        }
        (-self.rating.bypass_ntu_coefficient / mdot).exp()
    }
}

fn check_curve_arity(curves: &CurveSet, id: CurveId, role: CurveRole, speed: &str) -> CoilResult<()> {
    match curves.expect_arity(id, role.arity()) {
        Ok(()) => Ok(()),
        Err(CurveError::ArityMismatch {
            name,
            expected,
            got,
        }) => Err(CoilError::ArityMismatch {
            speed: speed.to_string(),
            role,
            curve: name,
            expected,
            got,
        }),
        Err(other) => Err(other.into()),
    }
}

/// Standard air density used to convert rated volume flows to mass flows.
pub fn rated_air_density() -> f64 {
    dx_psychro::density(constants::STD_PRESSURE_PA, 20.0, 0.0)
}
