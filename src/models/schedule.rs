//! Schedule display model.

use serde::Serialize;

use crate::api::{DayOfWeek, ScheduleDto};

/// One numbered lesson and where it takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonSlot {
    /// 1-based lesson number within the day
    pub number: usize,
    pub subject: String,
    /// Room, if the office list has one for this slot
    pub room: Option<String>,
}

/// A class's day with lessons paired to their rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleUi {
    pub schedule_id: String,
    pub class_name: String,
    pub day: DayOfWeek,
    /// Non-blank lessons only; numbering keeps the original positions
    pub slots: Vec<LessonSlot>,
}

impl From<ScheduleDto> for ScheduleUi {
    fn from(dto: ScheduleDto) -> Self {
        let slots = dto
            .lessons
            .iter()
            .enumerate()
            .filter(|(_, subject)| !subject.trim().is_empty())
            .map(|(index, subject)| LessonSlot {
                number: index + 1,
                subject: subject.trim().to_string(),
                room: dto
                    .office
                    .get(index)
                    .map(|room| room.trim())
                    .filter(|room| !room.is_empty())
                    .map(str::to_string),
            })
            .collect();

        Self {
            schedule_id: dto.schedule_id,
            class_name: dto.class_name,
            day: dto.day,
            slots,
        }
    }
}

impl ScheduleUi {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
