//! Property tests for event ids and persisted record round-trips.

use chrono::NaiveDate;
use matchday_core::{
    Action, EventRegistry, LogEntry, Match, MatchRef, NamespaceStore, Outcome, Period, Player,
    Position, Violation, Zone,
};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    "[A-Za-zÁÉÍÓÚÑáéíóúñ0-9 ]{0,12}"
}

fn one_of<T: Copy + std::fmt::Debug + 'static>(all: &'static [T]) -> impl Strategy<Value = T> {
    proptest::sample::select(all)
}

fn fixture() -> impl Strategy<Value = Match> {
    (text(), text(), text(), text(), text(), text()).prop_map(
        |(fecha, hora, local, visitante, competicion, cancha)| Match {
            fecha,
            hora,
            local,
            visitante,
            competicion,
            cancha,
        },
    )
}

fn player() -> impl Strategy<Value = Player> {
    (text(), any::<u32>(), one_of(Position::ALL), text()).prop_map(
        |(nombre, dorsal, posicion, equipo)| Player { nombre, dorsal, posicion, equipo },
    )
}

fn entry() -> impl Strategy<Value = LogEntry> {
    (
        one_of(Period::ALL),
        (0u64..6_000),
        text(),
        (one_of(Action::ALL), one_of(Zone::ALL), one_of(Outcome::ALL)),
        (0i64..86_400),
        proptest::option::of(fixture()),
    )
        .prop_map(|(periodo, secs, jugador, (accion, zona, resultado), offset, m)| LogEntry {
            periodo,
            tiempo: format!("{:02}:{:02}", secs / 60, secs % 60),
            jugador,
            accion,
            zona,
            resultado,
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
                + chrono::Duration::seconds(offset),
            match_ref: m.as_ref().map(Match::reference),
        })
}

proptest! {
    #[test]
    fn prop_event_id_must_have_seven_chars(id in "[A-Za-z0-9]{0,12}") {
        let store = NamespaceStore::in_memory("/events");
        let registry = EventRegistry::new(&store);

        let result = registry.create_event(&id, None);
        if id.len() == 7 {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert_eq!(err.violations(), &[Violation::EventIdLength(id.len())][..]);
        }
    }

    #[test]
    fn prop_records_roundtrip_through_store(
        matches in proptest::collection::vec(fixture(), 0..5),
        players in proptest::collection::vec(player(), 0..5),
        entries in proptest::collection::vec(entry(), 0..5),
    ) {
        let store = NamespaceStore::in_memory("/events");
        let handle = store.ensure_namespace("EVT0001").unwrap();

        store.write(&handle, "partidos.json", &matches).unwrap();
        store.write(&handle, "plantilla.json", &players).unwrap();
        store.write(&handle, "events_log.json", &entries).unwrap();

        prop_assert_eq!(store.read::<Vec<Match>>(&handle, "partidos.json").unwrap(), matches);
        prop_assert_eq!(store.read::<Vec<Player>>(&handle, "plantilla.json").unwrap(), players);
        prop_assert_eq!(store.read::<Vec<LogEntry>>(&handle, "events_log.json").unwrap(), entries);
    }

    #[test]
    fn prop_match_ref_identifies_its_match(m in fixture()) {
        let reference: MatchRef = m.reference();
        prop_assert!(reference.refers_to(&m));
    }
}
