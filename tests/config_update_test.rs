//! Merging a newer configuration into a populated record book.

use rstest::{fixture, rstest};

use arbook::callbacks::{AcceptAllActions, ErrorLog};
use arbook::config::Config;
use arbook::{current_doc_version, AgilityRecordBook, ElementNode, Q};

const BOOK_AKC: &str = r#"<AgilityBook Book="15.3">
  <Configuration version="8">
    <Venue Name="AKC">
      <Division Name="Novice">
        <Level Name="A"/>
        <Level Name="Excellent"/>
      </Division>
      <Event Name="Standard">
        <Scoring Division="Novice" Level="A" type="FaultsThenTime" hasTable="y">
          <TitlePoints Points="3" Faults="5"/>
        </Scoring>
      </Event>
    </Venue>
  </Configuration>
  <Dog CallName="Rex">
    <Trial>
      <Club Venue="AKC">Bay Team</Club>
      <Run Date="2024-05-04" Division="Novice" Level="A" Event="Standard">
        <ByTime hasTable="y" CourseFaults="0" Time="41.20" SCT="60.00"/>
        <Placement Q="Q" Place="1"/>
      </Run>
    </Trial>
  </Dog>
</AgilityBook>
"#;

fn load_book(xml: &str) -> AgilityRecordBook {
    let tree = ElementNode::load_xml_str(xml).unwrap();
    let mut book = AgilityRecordBook::default();
    let mut log = ErrorLog::new();
    book.load(&tree, &mut log).unwrap();
    assert!(log.messages.is_empty(), "{}", log.messages);
    book
}

fn load_config(xml: &str) -> Config {
    let tree = ElementNode::load_xml_str(xml).unwrap();
    let mut config = Config::default();
    let mut log = ErrorLog::tolerant();
    config.load(&tree, current_doc_version(), &mut log).unwrap();
    assert!(log.messages.is_empty(), "{}", log.messages);
    config
}

#[fixture]
fn akc_book() -> AgilityRecordBook {
    load_book(BOOK_AKC)
}

#[rstest]
fn given_the_same_configuration_when_updating_then_nothing_changes(
    mut akc_book: AgilityRecordBook,
) {
    let incoming = akc_book.config.clone();
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(!akc_book.update(1, &incoming, &mut info, &mut cb));
    assert!(info.is_empty(), "{info}");
    assert_eq!(akc_book.dogs[0].trials[0].runs.len(), 1);
}

#[rstest]
fn given_a_configuration_that_dropped_the_runs_scoring_when_updating_then_the_run_is_deleted(
    mut akc_book: AgilityRecordBook,
) {
    // Standard no longer offers Novice/A, so the recorded run has no
    // event definition left to score against.
    let incoming = load_config(
        r#"<Configuration version="9">
  <Venue Name="AKC">
    <Division Name="Novice">
      <Level Name="A"/>
      <Level Name="Excellent"/>
    </Division>
    <Event Name="Standard">
      <Scoring Division="Novice" Level="Excellent" type="FaultsThenTime">
        <TitlePoints Points="3" Faults="5"/>
      </Scoring>
    </Event>
  </Venue>
</Configuration>"#,
    );
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(akc_book.update(1, &incoming, &mut info, &mut cb));
    assert!(akc_book.dogs[0].trials[0].runs.is_empty());
    assert_eq!(cb.post_delete_messages.len(), 1);
    assert!(cb.post_delete_messages[0].contains("Deleted 1 runs"));
    assert!(info.contains("   2024-05-04 AKC Standard Novice/A"));
}

#[rstest]
fn given_a_delete_event_action_when_updating_then_the_event_and_its_runs_go(
    mut akc_book: AgilityRecordBook,
) {
    let incoming = load_config(
        r#"<Configuration version="9">
  <Action Verb="DeleteEvent" config="9" Venue="AKC" OldName="Standard"/>
  <Venue Name="AKC">
    <Division Name="Novice">
      <Level Name="A"/>
      <Level Name="Excellent"/>
    </Division>
    <Event Name="Jumpers">
      <Scoring Division="Novice" Level="A" type="FaultsThenTime">
        <TitlePoints Points="3" Faults="5"/>
      </Scoring>
    </Event>
  </Venue>
</Configuration>"#,
    );
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(akc_book.update(1, &incoming, &mut info, &mut cb));
    assert_eq!(cb.pre_delete_messages.len(), 1);
    assert!(cb.pre_delete_messages[0].contains("Deleting AKC Event [Standard]"));
    assert!(info.contains("Deleting AKC Event [Standard]"));

    // The trial lost its only run and went with it.
    assert!(akc_book.dogs[0].trials.is_empty());
    let venue = akc_book.config.venues.find_venue("AKC").unwrap();
    assert!(venue.events.find_event("Standard").is_none());
    assert!(venue.events.find_event("Jumpers").is_some());
}

#[rstest]
fn given_a_scoring_that_lost_its_title_points_when_updating_then_the_q_is_revoked(
    mut akc_book: AgilityRecordBook,
) {
    let incoming = load_config(
        r#"<Configuration version="9">
  <Venue Name="AKC">
    <Division Name="Novice">
      <Level Name="A"/>
      <Level Name="Excellent"/>
    </Division>
    <Event Name="Standard">
      <Scoring Division="Novice" Level="A" type="FaultsThenTime" hasTable="y"/>
    </Event>
  </Venue>
</Configuration>"#,
    );
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(akc_book.update(1, &incoming, &mut info, &mut cb));
    let run = &akc_book.dogs[0].trials[0].runs[0];
    assert_eq!(run.q, Q::Na);
}

#[rstest]
fn given_a_scoring_that_lost_the_table_when_updating_then_the_run_flag_clears(
    mut akc_book: AgilityRecordBook,
) {
    let incoming = load_config(
        r#"<Configuration version="9">
  <Venue Name="AKC">
    <Division Name="Novice">
      <Level Name="A"/>
      <Level Name="Excellent"/>
    </Division>
    <Event Name="Standard">
      <Scoring Division="Novice" Level="A" type="FaultsThenTime">
        <TitlePoints Points="3" Faults="5"/>
      </Scoring>
    </Event>
  </Venue>
</Configuration>"#,
    );
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(akc_book.update(1, &incoming, &mut info, &mut cb));
    let run = &akc_book.dogs[0].trials[0].runs[0];
    assert!(!run.scoring.table);
    assert_eq!(run.q, Q::Q);
    assert!(info.contains("Cleared the table setting on 1 runs"));
    assert!(info.contains("   2024-05-04 AKC Standard Novice/A"));
}

#[rstest]
fn given_usdaa_pairs_tournament_runs_when_crossing_config_24_then_they_move_to_team() {
    let mut book = load_book(
        r#"<AgilityBook Book="15.3">
  <Configuration version="23">
    <Venue Name="USDAA">
      <Division Name="Masters">
        <Level Name="Tournament"/>
      </Division>
      <Event Name="Pairs">
        <Scoring Division="Masters" Level="Tournament" type="FaultsThenTime">
          <TitlePoints Points="1" Faults="10"/>
        </Scoring>
      </Event>
    </Venue>
  </Configuration>
  <Dog CallName="Gia">
    <Trial>
      <Club Venue="USDAA">Flash Paws</Club>
      <Run Date="2024-03-10" Division="Masters" Level="Tournament" Event="Pairs">
        <ByTime CourseFaults="5" Time="38.00" SCT="50.00"/>
        <Placement Q="Q" Place="2"/>
      </Run>
    </Trial>
  </Dog>
</AgilityBook>
"#,
    );
    let incoming = load_config(
        r#"<Configuration version="24">
  <Venue Name="USDAA">
    <Division Name="Masters">
      <Level Name="Tournament"/>
    </Division>
    <Event Name="Pairs">
      <Scoring Division="Masters" Level="Tournament" type="FaultsThenTime">
        <TitlePoints Points="1" Faults="10"/>
      </Scoring>
    </Event>
    <Event Name="Team">
      <Scoring Division="Masters" Level="Tournament" type="FaultsThenTime">
        <TitlePoints Points="1" Faults="10"/>
      </Scoring>
    </Event>
  </Venue>
</Configuration>"#,
    );
    let mut info = String::new();
    let mut cb = AcceptAllActions::default();

    assert!(book.update(1, &incoming, &mut info, &mut cb));
    let run = &book.dogs[0].trials[0].runs[0];
    assert_eq!(run.event, "Team");
    assert_eq!(run.q, Q::Q);
    assert!(info.contains("Renamed 1 runs from Pairs to Team"));
    assert!(info.contains("   2024-03-10 USDAA Team Masters/Tournament"));
}
