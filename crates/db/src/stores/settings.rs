use timetable_core::{
    Session, TimetableError, TimetableResult, Weekday,
    models::settings::{
        DEFAULT_MAX_LUNCH_SLOTS, DefaultSettings, SettingsPatch, TimetableSettings,
        validate_enabled_days, validate_max_lunch_slots,
    },
};
use tracing::debug;
use uuid::Uuid;

use super::logged;
use crate::SharedRepository;

/// Enabled days and the lunch-slot policy of one timetable.
pub struct SettingsStore {
    repo: SharedRepository,
    session: Session,
    timetable_id: Uuid,
    settings: Option<TimetableSettings>,
}

impl SettingsStore {
    pub fn new(repo: SharedRepository, session: Session, timetable_id: Uuid) -> Self {
        Self {
            repo,
            session,
            timetable_id,
            settings: None,
        }
    }

    pub fn settings(&self) -> Option<&TimetableSettings> {
        self.settings.as_ref()
    }

    /// Enabled days, Monday first. Falls back to Monday-Friday before the
    /// settings are loaded.
    pub fn enabled_days(&self) -> Vec<Weekday> {
        match &self.settings {
            Some(settings) => settings.enabled_weekdays(),
            None => Weekday::WEEKDAYS.to_vec(),
        }
    }

    pub fn max_lunch_slots(&self) -> i32 {
        self.settings
            .as_ref()
            .map_or(DEFAULT_MAX_LUNCH_SLOTS, |s| s.max_lunch_slots)
    }

    pub fn lunch_slot_ids(&self) -> &[Uuid] {
        self.settings
            .as_ref()
            .map_or(&[], |s| s.lunch_slot_ids.as_slice())
    }

    /// Loads the settings row, creating the default one if there is none.
    pub async fn fetch_or_create(&mut self) -> TimetableResult<&TimetableSettings> {
        let user_id = self.session.user_id;
        let found = self
            .repo
            .get_settings(user_id, self.timetable_id)
            .await
            .map_err(logged("Fetching timetable settings"))?;

        let settings = match found {
            Some(settings) => settings,
            None => {
                debug!("Creating default settings for timetable {}", self.timetable_id);
                self.repo
                    .create_default_settings(user_id, self.timetable_id, DefaultSettings::default())
                    .await
                    .map_err(logged("Creating timetable settings"))?
            }
        };

        Ok(self.settings.insert(settings))
    }

    pub async fn update_enabled_days(&mut self, day_ids: &[i16]) -> TimetableResult<&TimetableSettings> {
        let days = validate_enabled_days(day_ids)?;
        self.apply(SettingsPatch::enabled_days(&days)).await
    }

    /// Refuses a maximum below the number of slots already marked as lunch.
    pub async fn update_max_lunch_slots(&mut self, max: i32) -> TimetableResult<&TimetableSettings> {
        let max = validate_max_lunch_slots(max)?;
        let marked = self.fetch_or_create().await?.lunch_slot_ids.len();
        if marked as i64 > i64::from(max) {
            return Err(TimetableError::Validation(format!(
                "{} lunch slot(s) are marked; unmark some before lowering the maximum to {}",
                marked, max
            )));
        }
        self.apply(SettingsPatch::max_lunch_slots(max)).await
    }

    pub async fn update_lunch_slot_ids(&mut self, ids: Vec<Uuid>) -> TimetableResult<&TimetableSettings> {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.apply(SettingsPatch::lunch_slot_ids(unique)).await
    }

    /// Adds or removes one slot from the lunch set. The maximum is not
    /// checked here; callers use [`TimetableSettings::can_add_lunch_slot`].
    pub async fn toggle_lunch_slot(
        &mut self,
        time_slot_id: Uuid,
        make_lunch: bool,
    ) -> TimetableResult<&TimetableSettings> {
        let ids = self
            .ensure()
            .await?
            .toggled_lunch_slots(time_slot_id, make_lunch);
        self.apply(SettingsPatch::lunch_slot_ids(ids)).await
    }

    async fn ensure(&mut self) -> TimetableResult<&TimetableSettings> {
        if self.settings.is_none() {
            self.fetch_or_create().await?;
        }
        self.settings
            .as_ref()
            .ok_or_else(|| TimetableError::NotFound("Timetable settings".to_string()))
    }

    async fn apply(&mut self, patch: SettingsPatch) -> TimetableResult<&TimetableSettings> {
        self.ensure().await?;

        let updated = self
            .repo
            .update_settings(self.session.user_id, self.timetable_id, patch)
            .await
            .map_err(logged("Updating timetable settings"))?
            .ok_or_else(|| TimetableError::NotFound("Timetable settings".to_string()))?;

        Ok(self.settings.insert(updated))
    }
}
