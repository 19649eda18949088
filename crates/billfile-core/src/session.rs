//! Filing session: the single-record edit/submit state machine.
//!
//! At most one record is ever being edited, and at most one submission is
//! ever in flight. A fresh fetch replaces the record list wholesale and
//! discards any edit in progress; the submitted-marker set only hides rows
//! until the next refresh confirms them gone.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::models::{Draft, FilingEntry, Record};
use crate::sheet::timestamp::{delay_days, format_instant};

/// Where the session currently is in the edit/submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No record selected
    Idle,
    /// One record selected, draft editable, nothing sent yet
    Editing,
    /// Request in flight, draft immutable
    Submitting,
}

/// Everything needed to post one filing entry to the write endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingRequest {
    pub record_id: usize,
    pub lift_number: String,
    pub entry: FilingEntry,
}

#[derive(Debug, Clone)]
struct EditSlot {
    record_id: usize,
    draft: Draft,
    in_flight: bool,
}

/// Session state for one sheet-backed filing page.
#[derive(Debug, Default)]
pub struct FilingSession {
    records: Vec<Record>,
    submitted: HashSet<usize>,
    edit: Option<EditSlot>,
}

impl FilingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record list with a fresh fetch.
    ///
    /// Any edit in progress is discarded; the submitted-marker set is kept
    /// so rows confirmed in this session stay hidden until upstream data
    /// reflects them.
    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        self.edit = None;
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.edit {
            None => Phase::Idle,
            Some(slot) if slot.in_flight => Phase::Submitting,
            Some(_) => Phase::Editing,
        }
    }

    /// Records still open for filing, with locally-submitted rows hidden.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|record| !self.submitted.contains(&record.id))
    }

    #[must_use]
    pub fn record(&self, record_id: usize) -> Option<&Record> {
        self.visible_records().find(|record| record.id == record_id)
    }

    /// Look up a visible record by its lift number.
    #[must_use]
    pub fn find_by_lift_number(&self, lift_number: &str) -> Option<&Record> {
        let lift_number = lift_number.trim();
        self.visible_records()
            .find(|record| record.lift_number == lift_number)
    }

    /// Select a record for editing, initializing a fresh draft.
    ///
    /// Drafts are never carried over between selections: re-selecting the
    /// same record starts from the defaults again.
    pub fn begin_edit(&mut self, record_id: usize) -> Result<&mut Draft> {
        if self.phase() == Phase::Submitting {
            return Err(Error::Validation(
                "a submission is already in flight".to_string(),
            ));
        }
        if self.record(record_id).is_none() {
            return Err(Error::Validation(format!(
                "record {record_id} is not in the current list"
            )));
        }
        let slot = self.edit.insert(EditSlot {
            record_id,
            draft: Draft::default(),
            in_flight: false,
        });
        Ok(&mut slot.draft)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.edit.as_ref().map(|slot| &slot.draft)
    }

    /// Mutable access to the draft; `None` while idle or submitting.
    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        self.edit
            .as_mut()
            .filter(|slot| !slot.in_flight)
            .map(|slot| &mut slot.draft)
    }

    /// Discard the draft without side effects. Refused while a request is
    /// in flight; a cancel with nothing selected is a no-op.
    pub fn cancel(&mut self) -> Result<()> {
        if self.phase() == Phase::Submitting {
            return Err(Error::Validation(
                "cannot cancel while a submission is in flight".to_string(),
            ));
        }
        self.edit = None;
        Ok(())
    }

    /// Confirm the draft: validate locally, move to `Submitting`, and build
    /// the write request.
    ///
    /// Validation failures (no selection, record gone from the current
    /// list, missing lift number) abort the transition before any network
    /// call and leave the session editable.
    pub fn prepare_submission(&mut self, now: NaiveDateTime) -> Result<FilingRequest> {
        let Some(record_id) = self.edit.as_ref().map(|slot| slot.record_id) else {
            return Err(Error::Validation("no record is selected".to_string()));
        };
        if self.phase() == Phase::Submitting {
            return Err(Error::Validation(
                "a submission is already in flight".to_string(),
            ));
        }

        let Some(record) = self.record(record_id) else {
            return Err(Error::Validation(format!(
                "record {record_id} is no longer in the current list"
            )));
        };
        if !record.has_lift_number() {
            return Err(Error::Validation(
                "record has no lift number".to_string(),
            ));
        }

        let lift_number = record.lift_number.clone();
        let delay = delay_days(&record.raw_timestamp, now);
        let slot = self
            .edit
            .as_mut()
            .ok_or_else(|| Error::Validation("no record is selected".to_string()))?;
        slot.in_flight = true;

        Ok(FilingRequest {
            record_id,
            lift_number,
            entry: FilingEntry {
                actual: format_instant(now),
                delay: delay.to_string(),
                status: slot.draft.status,
                remarks: slot.draft.remarks.clone(),
            },
        })
    }

    /// Record a confirmed success: hide the row locally and return to Idle.
    pub fn complete_submission(&mut self) -> Result<()> {
        let slot = self.take_in_flight()?;
        self.submitted.insert(slot.record_id);
        Ok(())
    }

    /// Record a failed submission: return to Editing with the draft intact
    /// so the user can retry or amend.
    pub fn fail_submission(&mut self) -> Result<()> {
        let slot = self.take_in_flight()?;
        self.edit = Some(EditSlot {
            in_flight: false,
            ..slot
        });
        Ok(())
    }

    fn take_in_flight(&mut self) -> Result<EditSlot> {
        match self.edit.take() {
            Some(slot) if slot.in_flight => Ok(slot),
            other => {
                self.edit = other;
                Err(Error::Validation("no submission is in flight".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilingStatus, EMPTY_FIELD};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(id: usize, lift: &str, raw_timestamp: &str) -> Record {
        Record {
            id,
            timestamp: EMPTY_FIELD.to_string(),
            raw_timestamp: raw_timestamp.to_string(),
            lift_number: lift.to_string(),
            bill_type: EMPTY_FIELD.to_string(),
            bill_number: EMPTY_FIELD.to_string(),
            party_name: EMPTY_FIELD.to_string(),
            product_name: EMPTY_FIELD.to_string(),
            quantity: EMPTY_FIELD.to_string(),
            transporter_name: EMPTY_FIELD.to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 3, 18)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn session_with(records: Vec<Record>) -> FilingSession {
        let mut session = FilingSession::new();
        session.load(records);
        session
    }

    #[test]
    fn starts_idle_with_no_draft() {
        let session = FilingSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.draft(), None);
    }

    #[test]
    fn begin_edit_initializes_fresh_draft_each_time() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        session.begin_edit(0).unwrap();
        session.draft_mut().unwrap().remarks = "half done".to_string();
        session.draft_mut().unwrap().status = FilingStatus::Done;

        // re-selecting resets to defaults, nothing is carried over
        session.begin_edit(0).unwrap();
        assert_eq!(session.draft(), Some(&Draft::default()));
        assert_eq!(session.phase(), Phase::Editing);
    }

    #[test]
    fn begin_edit_rejects_unknown_record() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        assert!(session.begin_edit(7).is_err());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn cancel_discards_draft_and_is_harmless_when_idle() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        session.cancel().unwrap();

        session.begin_edit(0).unwrap();
        session.draft_mut().unwrap().remarks = "temp".to_string();
        session.cancel().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.draft(), None);
    }

    #[test]
    fn prepare_without_selection_fails_before_any_network_call() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        assert!(session.prepare_submission(now()).is_err());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn prepare_rejects_record_without_lift_number() {
        let mut session = session_with(vec![record(0, "-", "45000")]);
        session.begin_edit(0).unwrap();
        let error = session.prepare_submission(now()).unwrap_err();
        assert!(error.to_string().contains("lift number"));
        // still editable for the user to act on the message
        assert_eq!(session.phase(), Phase::Editing);
    }

    #[test]
    fn prepare_rejects_record_that_vanished_on_refresh() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        session.begin_edit(0).unwrap();
        session.load(vec![record(1, "LIFT-2", "45000")]);
        // load discards the edit entirely
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.prepare_submission(now()).is_err());
    }

    #[test]
    fn prepare_builds_entry_with_actual_and_delay() {
        let mut session = session_with(vec![record(3, "LIFT-9", "45000")]);
        session.begin_edit(3).unwrap();
        {
            let draft = session.draft_mut().unwrap();
            draft.status = FilingStatus::Done;
            draft.remarks = "filed with courier".to_string();
        }

        let request = session.prepare_submission(now()).unwrap();
        assert_eq!(session.phase(), Phase::Submitting);
        assert_eq!(request.record_id, 3);
        assert_eq!(request.lift_number, "LIFT-9");
        // serial 45000 = 15/03/2023, three whole days before `now`
        assert_eq!(request.entry.delay, "3");
        assert_eq!(request.entry.actual, "18/03/2023 10:30:00");
        assert_eq!(request.entry.status, FilingStatus::Done);
        assert_eq!(request.entry.remarks, "filed with courier");
    }

    #[test]
    fn only_one_submission_in_flight() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        session.begin_edit(0).unwrap();
        session.prepare_submission(now()).unwrap();

        assert!(session.prepare_submission(now()).is_err());
        assert!(session.begin_edit(0).is_err());
        assert!(session.cancel().is_err());
        assert_eq!(session.draft_mut(), None);
    }

    #[test]
    fn success_hides_record_until_next_refresh_replaces_the_list() {
        let mut session = session_with(vec![
            record(0, "LIFT-1", "45000"),
            record(3, "LIFT-4", "45000"),
        ]);
        session.begin_edit(3).unwrap();
        session.prepare_submission(now()).unwrap();
        session.complete_submission().unwrap();

        assert_eq!(session.phase(), Phase::Idle);
        let visible: Vec<usize> = session.visible_records().map(|r| r.id).collect();
        assert_eq!(visible, vec![0]);
        assert_eq!(session.find_by_lift_number("LIFT-4"), None);

        // the marker also filters a refresh that still carries the row
        session.load(vec![record(0, "LIFT-1", "45000"), record(3, "LIFT-4", "45000")]);
        let visible: Vec<usize> = session.visible_records().map(|r| r.id).collect();
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn failure_returns_to_editing_with_draft_preserved() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        session.begin_edit(0).unwrap();
        session.draft_mut().unwrap().remarks = "retry me".to_string();
        session.prepare_submission(now()).unwrap();
        session.fail_submission().unwrap();

        assert_eq!(session.phase(), Phase::Editing);
        assert_eq!(session.draft().unwrap().remarks, "retry me");
        // record stays visible, nothing was marked submitted
        assert_eq!(session.visible_records().count(), 1);
    }

    #[test]
    fn completion_outside_submitting_is_an_error() {
        let mut session = session_with(vec![record(0, "LIFT-1", "45000")]);
        assert!(session.complete_submission().is_err());
        assert!(session.fail_submission().is_err());

        session.begin_edit(0).unwrap();
        assert!(session.complete_submission().is_err());
        assert_eq!(session.phase(), Phase::Editing);
    }
}
