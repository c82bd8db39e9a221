//! Row-by-row feature derivation.

use cardio_model::{DeriveConfig, FeaturedRecord, RawPatientRecord, UNKNOWN_BAND};
use tracing::{debug, info, warn};

use crate::dates::{DateSource, month_start, resolve_measure_date};
use crate::features::{age_years, bmi, hypertension_flag, lab_category, pulse_pressure};
use crate::identity::PatientIdGenerator;

#[derive(Debug, Default)]
struct DeriveStats {
    unknown_age_band: usize,
    unknown_bmi_band: usize,
    clipped_dates: usize,
    synthetic_dates: usize,
    unparseable_dates: usize,
}

/// Derives one featured record per raw record, preserving order.
///
/// No row is dropped. Values that cannot be computed are left undefined or
/// given the `unknown` band.
pub fn derive_features(raw: &[RawPatientRecord], config: &DeriveConfig) -> Vec<FeaturedRecord> {
    let mut ids = PatientIdGenerator::new(config.id_strategy.clone());
    let mut stats = DeriveStats::default();
    let mut featured = Vec::with_capacity(raw.len());

    for (position, record) in raw.iter().enumerate() {
        let (row, source) = derive_record(record, position, &mut ids, config);
        if row.age_band == UNKNOWN_BAND {
            stats.unknown_age_band += 1;
        }
        if row.bmi_band == UNKNOWN_BAND {
            stats.unknown_bmi_band += 1;
        }
        match source {
            DateSource::Supplied => {}
            DateSource::Clipped => stats.clipped_dates += 1,
            DateSource::Synthetic => stats.synthetic_dates += 1,
            DateSource::Unparseable => stats.unparseable_dates += 1,
        }
        featured.push(row);
    }

    debug!(
        ids_issued = ids.issued(),
        unknown_age_band = stats.unknown_age_band,
        unknown_bmi_band = stats.unknown_bmi_band,
        synthetic_dates = stats.synthetic_dates,
        "derivation gaps"
    );
    if stats.clipped_dates > 0 {
        warn!(
            rows = stats.clipped_dates,
            "measurement dates clipped into configured window"
        );
    }
    if stats.unparseable_dates > 0 {
        warn!(
            rows = stats.unparseable_dates,
            "unparseable measurement dates replaced with synthetic dates"
        );
    }
    info!(rows = featured.len(), "features derived");
    featured
}

/// Derives a single row. `position` is the zero-based input position.
pub fn derive_record(
    raw: &RawPatientRecord,
    position: usize,
    ids: &mut PatientIdGenerator,
    config: &DeriveConfig,
) -> (FeaturedRecord, DateSource) {
    let age_years = age_years(raw.age_days, config.days_per_year);
    let bmi = bmi(raw.height_cm, raw.weight_kg);
    let (measure_date, source) =
        resolve_measure_date(raw.measure_date.as_deref(), position, &config.measure_dates);

    let record = FeaturedRecord {
        patient_id: ids.next_id(raw),
        age_days: raw.age_days,
        age_years,
        age_band: config
            .age_bands
            .assign(age_years.map(|years| years as f64))
            .to_string(),
        gender: raw.gender,
        height: raw.height_cm,
        weight: raw.weight_kg,
        bmi,
        bmi_band: config.bmi_bands.assign(bmi).to_string(),
        ap_hi: raw.ap_hi,
        ap_lo: raw.ap_lo,
        pulse_pressure: pulse_pressure(raw.ap_hi, raw.ap_lo),
        bp_band: config
            .bp_bands
            .assign(raw.ap_hi.map(|v| v as f64))
            .to_string(),
        hypertension_flag: hypertension_flag(raw.ap_hi, raw.ap_lo, &config.hypertension),
        cholesterol_level: raw.cholesterol,
        cholesterol_category: lab_category(raw.cholesterol),
        glucose_level: raw.glucose,
        glucose_category: lab_category(raw.glucose),
        smoke: raw.smoke,
        alcohol: raw.alcohol,
        active: raw.active,
        measure_date,
        measure_month: month_start(measure_date),
        cardiovascular_event: raw.cardio,
    };
    (record, source)
}
