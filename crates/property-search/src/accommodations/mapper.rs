use super::domain::{Accommodation, AccommodationRecord};

/// Translates between the domain accommodation and its storage record.
pub trait AccommodationMapper: Send + Sync {
    fn to_record(&self, accommodation: &Accommodation) -> AccommodationRecord;
    fn to_domain(&self, record: AccommodationRecord) -> Accommodation;
}

/// Field-for-field mapper used unless storage needs its own projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMapper;

impl AccommodationMapper for RecordMapper {
    fn to_record(&self, accommodation: &Accommodation) -> AccommodationRecord {
        AccommodationRecord {
            id: accommodation.id,
            title: accommodation.title.clone(),
            description: accommodation.description.clone(),
            user_id: accommodation.user_id,
            price: accommodation.price,
        }
    }

    fn to_domain(&self, record: AccommodationRecord) -> Accommodation {
        Accommodation {
            id: record.id,
            title: record.title,
            description: record.description,
            user_id: record.user_id,
            price: record.price,
        }
    }
}
