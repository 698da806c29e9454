//! Enums used as keys for retrieving values from an analysis.
use strum_macros::{Display, EnumIter, EnumString};

/// Every index computed by the battery in [`Analysis`](crate::Analysis).
///
/// The `Display` names are short labels suitable for a table of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
pub enum Index {
    /// Surface based CAPE (J/kg)
    #[strum(serialize = "SBCAPE")]
    SurfaceCape,
    /// Surface based CIN (J/kg)
    #[strum(serialize = "SBCIN")]
    SurfaceCin,
    /// Surface based LCL pressure (hPa)
    #[strum(serialize = "SBLCL")]
    SurfaceLclPressure,
    /// Surface based LCL height above ground level (m)
    #[strum(serialize = "SBLCL AGL")]
    SurfaceLclHeight,
    /// Surface based level of free convection (hPa)
    #[strum(serialize = "SBLFC")]
    SurfaceLfcPressure,
    /// Surface based equilibrium level (hPa)
    #[strum(serialize = "SBEL")]
    SurfaceElPressure,
    /// Mixed layer CAPE (J/kg)
    #[strum(serialize = "MLCAPE")]
    MixedLayerCape,
    /// Mixed layer CIN (J/kg)
    #[strum(serialize = "MLCIN")]
    MixedLayerCin,
    /// Pressure of the most unstable parcel (hPa)
    #[strum(serialize = "MU Level")]
    MostUnstablePressure,
    /// Most unstable CAPE (J/kg)
    #[strum(serialize = "MUCAPE")]
    MostUnstableCape,
    /// Most unstable CIN (J/kg)
    #[strum(serialize = "MUCIN")]
    MostUnstableCin,
    /// Lifted index of the surface parcel
    #[strum(serialize = "LI")]
    LiftedIndex,
    /// Showalter index
    #[strum(serialize = "SI")]
    Showalter,
    /// K-index
    #[strum(serialize = "K")]
    KIndex,
    /// Total Totals
    #[strum(serialize = "TT")]
    TotalTotals,
    /// Vertical Totals
    #[strum(serialize = "VT")]
    VerticalTotals,
    /// Cross Totals
    #[strum(serialize = "CT")]
    CrossTotals,
    /// Severe Weather Threat index
    #[strum(serialize = "SWEAT")]
    Sweat,
    /// Boyden index
    #[strum(serialize = "Boyden")]
    Boyden,
    /// Precipitable water (mm)
    #[strum(serialize = "PW")]
    PrecipitableWater,
    /// 0-1 km bulk shear (m/s)
    #[strum(serialize = "Shear 0-1km")]
    BulkShear1km,
    /// 0-6 km bulk shear (m/s)
    #[strum(serialize = "Shear 0-6km")]
    BulkShear6km,
    /// Effective bulk wind difference (m/s)
    #[strum(serialize = "EBWD")]
    EffectiveBulkShear,
    /// 0-1 km storm relative helicity of the right mover (m^2/s^2)
    #[strum(serialize = "SRH 0-1km")]
    Srh1km,
    /// 0-3 km storm relative helicity of the right mover (m^2/s^2)
    #[strum(serialize = "SRH 0-3km")]
    Srh3km,
    /// Effective storm relative helicity (m^2/s^2)
    #[strum(serialize = "ESRH")]
    EffectiveSrh,
    /// 0-1 km energy helicity index
    #[strum(serialize = "EHI 0-1km")]
    Ehi1km,
    /// 0-3 km energy helicity index
    #[strum(serialize = "EHI 0-3km")]
    Ehi3km,
    /// Supercell composite parameter
    #[strum(serialize = "SCP")]
    Scp,
    /// Fixed layer significant tornado parameter
    #[strum(serialize = "STP")]
    Stp,
    /// Bottom of the effective inflow layer (hPa)
    #[strum(serialize = "Eff Inflow Base")]
    EffectiveInflowBottom,
    /// Top of the effective inflow layer (hPa)
    #[strum(serialize = "Eff Inflow Top")]
    EffectiveInflowTop,
    /// Direction of the Bunkers right mover (degrees)
    #[strum(serialize = "Bunkers RM Dir")]
    BunkersRightDirection,
    /// Speed of the Bunkers right mover (m/s)
    #[strum(serialize = "Bunkers RM Spd")]
    BunkersRightSpeed,
    /// Direction of the Bunkers left mover (degrees)
    #[strum(serialize = "Bunkers LM Dir")]
    BunkersLeftDirection,
    /// Speed of the Bunkers left mover (m/s)
    #[strum(serialize = "Bunkers LM Spd")]
    BunkersLeftSpeed,
}
