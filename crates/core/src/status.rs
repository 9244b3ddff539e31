//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table. The wire name is the
//! lowercase `name` column of that table.

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Wire/database name of the status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Listing availability. Only ever moves `Available -> Sold`.
    ListingStatus {
        Available = 1 => "available",
        Sold = 2 => "sold",
    }
}

define_status_enum! {
    /// Offer lifecycle status. `Accepted` and `Rejected` are terminal.
    OfferStatus {
        Pending = 1 => "pending",
        Accepted = 2 => "accepted",
        Rejected = 3 => "rejected",
    }
}

impl OfferStatus {
    /// Whether no further transition is possible from this status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_status_ids_match_seed_data() {
        assert_eq!(ListingStatus::Available.id(), 1);
        assert_eq!(ListingStatus::Sold.id(), 2);
    }

    #[test]
    fn offer_status_ids_match_seed_data() {
        assert_eq!(OfferStatus::Pending.id(), 1);
        assert_eq!(OfferStatus::Accepted.id(), 2);
        assert_eq!(OfferStatus::Rejected.id(), 3);
    }

    #[test]
    fn from_id_round_trips_and_rejects_unknown() {
        assert_eq!(OfferStatus::from_id(2), Some(OfferStatus::Accepted));
        assert_eq!(ListingStatus::from_id(2), Some(ListingStatus::Sold));
        assert_eq!(OfferStatus::from_id(0), None);
        assert_eq!(ListingStatus::from_id(3), None);
    }

    #[test]
    fn statuses_serialize_as_lowercase_names() {
        assert_eq!(
            serde_json::to_value(OfferStatus::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert_eq!(
            serde_json::to_value(ListingStatus::Sold).unwrap(),
            serde_json::json!("sold")
        );
        assert_eq!(OfferStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!OfferStatus::Pending.is_terminal());
        assert!(OfferStatus::Accepted.is_terminal());
        assert!(OfferStatus::Rejected.is_terminal());
    }
}
