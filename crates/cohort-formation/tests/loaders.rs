//! Store-backed loading and end-to-end allocation.

use cohort_core::*;
use cohort_formation::*;
use cohort_state::*;

const SESSION: SessionId = SessionId(1);
const SURVEY: SurveyId = SurveyId(7);

fn test_store() -> StateStore {
    StateStore::open_in_memory().unwrap()
}

fn monday(start: f64, end: f64) -> Availability {
    Availability::from_range(start, end).unwrap()
}

fn member(user: u64, team: Option<u64>, role: Role) -> Membership {
    Membership {
        user: UserId(user),
        session: SESSION,
        team: team.map(TeamId),
        role,
    }
}

fn response(user: u64, rank: Option<u32>, score: Option<i64>) -> SurveyResponse {
    SurveyResponse {
        id: ResponseId(1000 + user),
        survey: SURVEY,
        user: UserId(user),
        selection_rank: rank,
        score,
    }
}

/// One session with two teams. Team 1 (project 1) has navigator 1 and
/// captain 2; team 2 (project 2) has navigator 3 and is already full.
fn seeded_store() -> StateStore {
    let store = test_store();
    store
        .put_session(&SessionRecord {
            id: SESSION,
            title: "Session 5".into(),
            application_survey: Some(SURVEY),
        })
        .unwrap();
    for (id, project) in [(1, 1), (2, 2)] {
        store
            .put_team(&TeamRecord {
                id: TeamId(id),
                session: SESSION,
                name: format!("team-{id}"),
                project: ProjectId(project),
            })
            .unwrap();
    }
    for m in [
        member(1, Some(1), Role::Navigator),
        member(2, Some(1), Role::Captain),
        member(3, Some(2), Role::Navigator),
        member(30, Some(2), Role::Djangonaut),
        member(31, Some(2), Role::Djangonaut),
        member(32, Some(2), Role::Djangonaut),
    ] {
        store.put_membership(&m).unwrap();
    }
    store
}

fn free_monday(store: &StateStore, users: &[u64]) {
    for &user in users {
        store.put_availability(UserId(user), &monday(24.0, 36.0)).unwrap();
    }
}

#[test]
fn no_survey_means_no_candidates() {
    let store = test_store();
    store
        .put_session(&SessionRecord {
            id: SESSION,
            title: "no survey".into(),
            application_survey: None,
        })
        .unwrap();

    assert!(get_allocation_candidates(&store, SESSION, 3).unwrap().is_empty());

    let outcome = allocate_session(&store, SESSION, &FormationConfig::default()).unwrap();
    assert_eq!(outcome.total_allocated(), 0);
}

#[test]
fn unknown_session_means_no_candidates() {
    let store = test_store();
    assert!(get_allocation_candidates(&store, SessionId(99), 3).unwrap().is_empty());
}

#[test]
fn candidates_filtered_and_sorted() {
    let store = seeded_store();
    for r in [
        response(10, Some(1), Some(50)),
        response(11, Some(0), None),
        response(12, Some(0), Some(20)),
        response(13, None, Some(99)),
        response(14, Some(3), Some(10)),
        response(30, Some(0), Some(100)),
    ] {
        store.put_response(&r).unwrap();
    }
    store
        .put_preference(&ProjectPreference {
            session: SESSION,
            user: UserId(10),
            project: ProjectId(2),
        })
        .unwrap();

    let candidates = get_allocation_candidates(&store, SESSION, 2).unwrap();
    let users: Vec<u64> = candidates.iter().map(|c| c.user.0).collect();
    assert_eq!(users, vec![12, 11, 10]);

    let c10 = &candidates[2];
    assert_eq!(c10.project_preferences, vec![ProjectId(2)]);
    assert_eq!(c10.response, ResponseId(1010));
    assert!(candidates[0].project_preferences.is_empty());

    let with_overflow = get_allocation_candidates(&store, SESSION, 3).unwrap();
    assert_eq!(with_overflow.len(), 4);
}

#[test]
fn existing_members_are_not_candidates() {
    let store = seeded_store();
    free_monday(&store, &[1, 2, 10, 11, 12, 13]);
    store.put_membership(&member(10, None, Role::Organizer)).unwrap();
    for r in [
        response(1, Some(0), Some(99)),
        response(10, Some(0), Some(90)),
        response(11, Some(0), Some(80)),
        response(12, Some(1), Some(70)),
        response(13, Some(2), Some(60)),
    ] {
        store.put_response(&r).unwrap();
    }

    let candidates = get_allocation_candidates(&store, SESSION, 2).unwrap();
    let users: Vec<u64> = candidates.iter().map(|c| c.user.0).collect();
    assert_eq!(users, vec![11, 12, 13]);

    // The organizer's seat goes to the next applicant instead.
    let outcome = allocate_session(&store, SESSION, &FormationConfig::default()).unwrap();
    let team = outcome.state.team(TeamId(1)).unwrap();
    assert_eq!(team.current_djangonauts, vec![UserId(11), UserId(12), UserId(13)]);
}

#[test]
fn team_slots_skip_full_teams() {
    let store = seeded_store();
    store.put_membership(&member(20, Some(1), Role::Djangonaut)).unwrap();

    let slots = get_team_slots(&store, SESSION, 3).unwrap();
    assert_eq!(slots.len(), 1);

    let slot = &slots[0];
    assert_eq!(slot.id(), TeamId(1));
    assert_eq!(slot.team.project, ProjectId(1));
    assert_eq!(&*slot.navigators, &[UserId(1)]);
    assert_eq!(slot.captain, Some(UserId(2)));
    assert_eq!(slot.current_djangonauts, vec![UserId(20)]);
    assert_eq!(slot.available_slots(), 2);

    let roomy = get_team_slots(&store, SESSION, 4).unwrap();
    assert_eq!(roomy.len(), 2);
}

#[test]
fn allocate_session_runs_both_phases() {
    let store = seeded_store();
    free_monday(&store, &[1, 2, 10, 11, 12, 13]);
    for r in [
        response(10, Some(0), Some(90)),
        response(11, Some(2), Some(40)),
        response(12, Some(3), Some(70)),
        response(13, Some(3), Some(60)),
    ] {
        store.put_response(&r).unwrap();
    }

    let outcome = allocate_session(&store, SESSION, &FormationConfig::default()).unwrap();

    assert_eq!(outcome.phase1_allocated, 2);
    assert_eq!(outcome.phase2_allocated, 1);
    let team = outcome.state.team(TeamId(1)).unwrap();
    assert_eq!(team.current_djangonauts, vec![UserId(10), UserId(11), UserId(12)]);
    assert!(team.overlap_report(&FormationContext::new(
        &load_availability(&store).unwrap(),
        Default::default()
    ))
    .is_valid);
    // The full team 2 is not part of the search.
    assert_eq!(outcome.state.teams.len(), 1);
}

#[test]
fn captain_overlap_blocks_candidate() {
    let store = seeded_store();
    free_monday(&store, &[1, 10]);
    // Captain only free on Tuesday.
    store.put_availability(UserId(2), &monday(48.0, 58.0)).unwrap();
    store.put_response(&response(10, Some(0), None)).unwrap();

    let outcome = allocate_session(&store, SESSION, &FormationConfig::default()).unwrap();
    assert_eq!(outcome.total_allocated(), 0);
    assert_eq!(outcome.state.unallocated.len(), 1);
}

#[test]
fn thresholds_come_from_config() {
    let store = seeded_store();
    free_monday(&store, &[1, 2]);
    store.put_availability(UserId(10), &monday(24.0, 28.0)).unwrap();
    store.put_response(&response(10, Some(0), None)).unwrap();

    let strict = allocate_session(&store, SESSION, &FormationConfig::default()).unwrap();
    assert_eq!(strict.total_allocated(), 0);

    let config = FormationConfig::from_toml_str(
        "[thresholds]\nnavigator_meeting_hours = 2\ncaptain_overlap_hours = 2\n",
    )
    .unwrap();
    let relaxed = allocate_session(&store, SESSION, &config).unwrap();
    assert_eq!(relaxed.total_allocated(), 1);
}

#[test]
fn loads_from_disk_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cohort.redb");
    {
        let store = StateStore::open(&path).unwrap();
        store.put_availability(UserId(5), &monday(24.0, 25.0)).unwrap();
    }

    let store = StateStore::open(&path).unwrap();
    let book = load_availability(&store).unwrap();
    assert_eq!(book.len(), 1);
}
