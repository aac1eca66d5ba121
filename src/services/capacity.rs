use serde::{Deserialize, Serialize};

/// Per-room-type occupancy limits used for room-count recommendations and
/// guest validation. `max_guests_total` is always `max_rooms_of_type *
/// guests_per_room` for the known profiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityProfile {
    pub max_guests_total: u32,
    pub max_rooms_of_type: u32,
    pub guests_per_room: u32,
}

/// Fallback profile for room types the property has not configured limits
/// for. The caller must always be able to compute some recommendation, so
/// lookups never fail.
pub const DEFAULT_PROFILE: CapacityProfile = CapacityProfile {
    max_guests_total: 9,
    max_rooms_of_type: 6,
    guests_per_room: 3,
};

const KNOWN_PROFILES: &[(&str, CapacityProfile)] = &[
    (
        "Family Suite",
        CapacityProfile {
            max_guests_total: 9,
            max_rooms_of_type: 3,
            guests_per_room: 3,
        },
    ),
    (
        "Deluxe Mountain View",
        CapacityProfile {
            max_guests_total: 6,
            max_rooms_of_type: 2,
            guests_per_room: 3,
        },
    ),
    (
        "Cozy Mountain Cabin",
        CapacityProfile {
            max_guests_total: 3,
            max_rooms_of_type: 1,
            guests_per_room: 3,
        },
    ),
];

#[must_use]
pub fn capacity_profile_for(room_type_name: &str) -> CapacityProfile {
    KNOWN_PROFILES
        .iter()
        .find(|(name, _)| *name == room_type_name)
        .map_or(DEFAULT_PROFILE, |(_, profile)| *profile)
}

/// Minimum number of rooms that fits `guests`, capped at what the property
/// actually has of this type. Zero guests recommend a single room so the
/// field never drops to zero while the user is still typing.
#[must_use]
pub fn recommended_rooms(guests: u32, profile: &CapacityProfile) -> u32 {
    if guests == 0 {
        return 1;
    }
    let required = guests.div_ceil(profile.guests_per_room);
    required.min(profile.max_rooms_of_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_profiles_are_internally_consistent() {
        for (name, profile) in KNOWN_PROFILES {
            assert_eq!(
                profile.max_guests_total,
                profile.max_rooms_of_type * profile.guests_per_room,
                "profile for {name} is inconsistent"
            );
        }
    }

    #[test]
    fn unknown_room_type_falls_back_to_default() {
        assert_eq!(capacity_profile_for("Treehouse"), DEFAULT_PROFILE);
        assert_eq!(capacity_profile_for(""), DEFAULT_PROFILE);
    }

    #[test]
    fn known_room_types_resolve() {
        let cabin = capacity_profile_for("Cozy Mountain Cabin");
        assert_eq!(cabin.max_guests_total, 3);
        assert_eq!(cabin.max_rooms_of_type, 1);

        let suite = capacity_profile_for("Family Suite");
        assert_eq!(suite.max_guests_total, 9);
        assert_eq!(suite.max_rooms_of_type, 3);
    }

    #[test]
    fn single_cabin_fits_three_guests() {
        let cabin = capacity_profile_for("Cozy Mountain Cabin");
        assert_eq!(recommended_rooms(3, &cabin), 1);
    }

    #[test]
    fn seven_guests_need_three_suites() {
        let suite = capacity_profile_for("Family Suite");
        assert_eq!(recommended_rooms(7, &suite), 3);
        // capped at the number of suites the property has
        assert_eq!(recommended_rooms(20, &suite), 3);
    }

    #[test]
    fn recommendation_is_monotonic_and_capped() {
        let profile = capacity_profile_for("Deluxe Mountain View");
        let mut previous = 0;
        for guests in 0..=30 {
            let rooms = recommended_rooms(guests, &profile);
            assert!(rooms >= previous || guests == 0);
            assert!(rooms <= profile.max_rooms_of_type);
            if guests > 0 {
                previous = rooms;
            }
        }
    }

    #[test]
    fn zero_guests_still_recommend_one_room() {
        assert_eq!(recommended_rooms(0, &DEFAULT_PROFILE), 1);
    }
}
