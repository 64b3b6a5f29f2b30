use chrono::{DateTime, Utc};

use crate::models::StopPlaceRecord;

/// Decide whether a stop place should be exported at all.
///
/// Rail replacement bus stops never are. Stops without quays only pass when
/// flagged as parent stops. Stops with validity intervals must be inside one
/// of them at `now`.
pub fn is_exportable(record: &StopPlaceRecord, now: DateTime<Utc>) -> bool {
    if record.is_rail_replacement_bus() {
        return false;
    }

    if record.quays.is_empty() && !record.is_flagged_parent() {
        return false;
    }

    record.valid_between.is_empty() || record.valid_between.iter().any(|v| v.contains(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stop_place::{KEY_IS_PARENT_STOP_PLACE, RAIL_REPLACEMENT_BUS};
    use crate::models::{TransportMode, ValidBetween};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    fn stop() -> StopPlaceRecord {
        let mut record = StopPlaceRecord::new("NSR:StopPlace:1");
        record.quays = vec!["NSR:Quay:1".to_string()];
        record
    }

    #[test]
    fn test_plain_stop_passes() {
        assert!(is_exportable(&stop(), now()));
    }

    #[test]
    fn test_rail_replacement_bus_excluded() {
        let mut record = stop();
        record.transport_mode = Some(TransportMode::Bus);
        record.submode = Some(RAIL_REPLACEMENT_BUS.to_string());
        record.valid_between = vec![ValidBetween {
            from: Some(now() - Duration::days(1)),
            to: Some(now() + Duration::days(1)),
        }];

        assert!(!is_exportable(&record, now()));
    }

    #[test]
    fn test_quayless_stop_needs_parent_flag() {
        let mut record = stop();
        record.quays.clear();
        assert!(!is_exportable(&record, now()));

        record
            .key_values
            .insert(KEY_IS_PARENT_STOP_PLACE.to_string(), "true".to_string());
        assert!(is_exportable(&record, now()));
    }

    #[test]
    fn test_validity_interval() {
        let mut record = stop();

        record.valid_between = vec![ValidBetween {
            from: Some(now() - Duration::days(1)),
            to: Some(now() + Duration::days(1)),
        }];
        assert!(is_exportable(&record, now()));

        record.valid_between = vec![ValidBetween {
            from: Some(now() + Duration::days(1)),
            to: Some(now() + Duration::days(2)),
        }];
        assert!(!is_exportable(&record, now()));

        record.valid_between = vec![ValidBetween {
            from: Some(now()),
            to: Some(now()),
        }];
        assert!(is_exportable(&record, now()));
    }
}
