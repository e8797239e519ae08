use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::models::{SlotError, TimeSlot};
use crate::store::SlotRepository;

/// In-memory slot store. Capacity changes happen under one lock, which gives
/// the same atomicity the SQL backend gets from conditional updates.
#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<Uuid, TimeSlot>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotRepository for MemorySlotStore {
    async fn insert(&self, slot: TimeSlot) -> Result<TimeSlot, SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        slots.insert(slot.id, slot.clone());
        Ok(slot)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<TimeSlot>, SlotError> {
        let slots = self.slots.lock().expect("slot store lock poisoned");
        Ok(slots.get(&id).cloned())
    }

    async fn find_by_schedule(
        &self,
        doctor_id: i32,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Option<TimeSlot>, SlotError> {
        let slots = self.slots.lock().expect("slot store lock poisoned");
        Ok(slots
            .values()
            .find(|s| s.doctor_id == doctor_id && s.date == date && s.time == time)
            .cloned())
    }

    async fn list_bookable_for_doctor(
        &self,
        doctor_id: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let slots = self.slots.lock().expect("slot store lock poisoned");
        let mut result: Vec<TimeSlot> = slots
            .values()
            .filter(|s| s.doctor_id == doctor_id && s.is_bookable_at(now))
            .cloned()
            .collect();
        result.sort_by_key(|s| (s.date, s.time));
        Ok(result)
    }

    async fn list_for_facility(
        &self,
        hospital_id: i32,
        from: NaiveDate,
    ) -> Result<Vec<TimeSlot>, SlotError> {
        let slots = self.slots.lock().expect("slot store lock poisoned");
        let mut result: Vec<TimeSlot> = slots
            .values()
            .filter(|s| s.hospital_id == hospital_id && s.date >= from)
            .cloned()
            .collect();
        result.sort_by_key(|s| (s.date, s.time));
        Ok(result)
    }

    async fn update(&self, slot: &TimeSlot) -> Result<TimeSlot, SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        if !slots.contains_key(&slot.id) {
            return Err(SlotError::NotFound);
        }
        slots.insert(slot.id, slot.clone());
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        Ok(slots.remove(&id).is_some())
    }

    async fn try_reserve(&self, id: Uuid) -> Result<bool, SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        let slot = slots.get_mut(&id).ok_or(SlotError::NotFound)?;
        if slot.current_bookings < slot.max_bookings {
            slot.current_bookings += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn release(&self, id: Uuid) -> Result<(), SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        if let Some(slot) = slots.get_mut(&id) {
            if slot.current_bookings > 0 {
                slot.current_bookings -= 1;
            }
        }
        Ok(())
    }

    async fn deactivate_expired(&self, now: NaiveDateTime) -> Result<u64, SlotError> {
        let mut slots = self.slots.lock().expect("slot store lock poisoned");
        let mut flipped = 0;
        for slot in slots.values_mut() {
            if slot.is_active && slot.instant() <= now {
                slot.is_active = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}
