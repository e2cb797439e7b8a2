//! End-to-end load and save of complete document files.

use rstest::rstest;

use arbook::callbacks::ErrorLog;
use arbook::dog::run_scoring::RunScoringType;
use arbook::{AgilityRecordBook, ArbError, ElementNode, Q};

const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<AgilityBook Book="15.3">
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
  <Dog CallName="Rex" DOB="2019-01-01">
    <Breed>Border Collie</Breed>
    <Trial>
      <Location>Fairgrounds</Location>
      <Club Venue="AKC">Bay Team</Club>
      <Run Date="2024-05-04" Division="Novice" Level="A" Height="20" Event="Standard">
        <Judge>Pat Benson</Judge>
        <ByTime hasTable="y" CourseFaults="0" Time="41.20" SCT="60.00" Yards="150.00"/>
        <Placement Q="Q" Place="1" InClass="12" DogsQd="5"/>
      </Run>
    </Trial>
  </Dog>
</AgilityBook>
"#;

fn load_sample() -> AgilityRecordBook {
    let tree = ElementNode::load_xml_str(SAMPLE).unwrap();
    let mut book = AgilityRecordBook::default();
    let mut log = ErrorLog::new();
    book.load(&tree, &mut log).unwrap();
    assert!(log.messages.is_empty(), "{}", log.messages);
    book
}

#[rstest]
fn given_a_sample_file_when_loaded_then_every_section_populates() {
    let book = load_sample();

    assert_eq!(book.config.version, 8);
    assert!(book.config.venues.find_venue("AKC").is_some());

    assert_eq!(book.dogs.len(), 1);
    let dog = &book.dogs[0];
    assert_eq!(dog.call_name, "Rex");
    assert_eq!(dog.breed, "Border Collie");

    assert_eq!(dog.trials.len(), 1);
    let trial = &dog.trials[0];
    assert_eq!(trial.location, "Fairgrounds");
    assert_eq!(trial.clubs.len(), 1);
    assert_eq!(trial.clubs[0].name, "Bay Team");

    assert_eq!(trial.runs.len(), 1);
    let run = &trial.runs[0];
    assert_eq!(run.event, "Standard");
    assert_eq!(run.height, "20");
    assert_eq!(run.judge, "Pat Benson");
    assert_eq!(run.q, Q::Q);
    assert_eq!(run.scoring.scoring_type, RunScoringType::ByTime);
    assert!(run.scoring.table);
    assert_eq!(run.scoring.time, 41.2);
}

#[rstest]
fn given_a_book_when_saved_to_disk_then_it_reloads_identically() {
    let book = load_sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rex.arb");

    book.save_file(&path).unwrap();

    let mut log = ErrorLog::new();
    let reloaded = AgilityRecordBook::load_file(&path, &mut log).unwrap();
    assert!(log.messages.is_empty(), "{}", log.messages);
    assert_eq!(reloaded, book);
}

#[rstest]
#[case::newer_major("16.0")]
#[case::pre_history("0.9")]
fn given_an_unreadable_document_version_when_loading_then_it_is_refused(#[case] version: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.arb");
    let data = format!(
        "<?xml version=\"1.0\"?>\n<AgilityBook Book=\"{version}\"><Configuration/></AgilityBook>"
    );
    std::fs::write(&path, data).unwrap();

    let mut log = ErrorLog::tolerant();
    let err = AgilityRecordBook::load_file(&path, &mut log).unwrap_err();
    assert!(matches!(
        err,
        ArbError::FutureDocVersion(_) | ArbError::UnknownDocVersion(_)
    ));
    assert!(!log.messages.is_empty());
}

#[rstest]
fn given_a_missing_file_when_loading_then_the_io_error_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = ErrorLog::new();
    let err = AgilityRecordBook::load_file(&dir.path().join("nope.arb"), &mut log).unwrap_err();
    assert!(matches!(err, ArbError::Io(_)));
}
