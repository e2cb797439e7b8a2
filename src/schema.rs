//! Literal element and attribute names of the file format.
//!
//! These strings are load-bearing: existing user files depend on them,
//! so they are kept verbatim across schema revisions. Names introduced
//! by later file versions are grouped at the end of each block.

// Top level
pub const TREE_BOOK: &str = "AgilityBook";
pub const TREE_CALENDAR: &str = "Calendar";
pub const TREE_TRAINING: &str = "Training";
pub const TREE_CONFIG: &str = "Configuration";
pub const TREE_INFO: &str = "Info";
pub const TREE_DOG: &str = "Dog";

pub const ATTRIB_BOOK_VERSION: &str = "Book";
pub const ATTRIB_BOOK_PGM_VERSION: &str = "ver";
pub const ATTRIB_BOOK_PLATFORM: &str = "platform";
pub const ATTRIB_BOOK_OS: &str = "os";
pub const ATTRIB_BOOK_TIMESTAMP: &str = "timestamp";

// Configuration
pub const TREE_ACTION: &str = "Action";
pub const TREE_VENUE: &str = "Venue";
pub const TREE_VENUE_DESC: &str = "Desc";
pub const TREE_TITLES: &str = "Titles";
pub const TREE_MULTIQ: &str = "MultiQ";
pub const TREE_MULTIQ_ITEM: &str = "MultiQItem";
pub const TREE_DIVISION: &str = "Division";
pub const TREE_LEVEL: &str = "Level";
pub const TREE_SUBLEVEL: &str = "SubLevel";
pub const TREE_EVENT: &str = "Event";
pub const TREE_EVENT_DESC: &str = "Desc";
pub const TREE_EVENT_SUBNAME: &str = "SubName";
pub const TREE_SCORING: &str = "Scoring";
pub const TREE_SCORING_SUBNAME: &str = "SubName";
pub const TREE_PLACE_INFO: &str = "PlaceInfo";
pub const TREE_TITLE_POINTS: &str = "TitlePoints";
pub const TREE_LIFETIME_POINTS: &str = "LifeTimePoints";
pub const TREE_LIFETIME_POINTS_LEGACY: &str = "LifeTime";
pub const TREE_LIFETIME_NAME: &str = "LifetimeName";
pub const TREE_PLACEMENTS: &str = "Placements";
pub const TREE_FAULTTYPE: &str = "FaultType";
pub const TREE_OTHERPTS: &str = "OtherPts";

pub const ATTRIB_CONFIG_VERSION: &str = "version";
pub const ATTRIB_CONFIG_UPDATE: &str = "update";

pub const ATTRIB_ACTION_VERB: &str = "Verb";
pub const ATTRIB_ACTION_CONFIG: &str = "config";
pub const ATTRIB_ACTION_VENUE: &str = "Venue";
pub const ATTRIB_ACTION_DIVISION: &str = "Div";
pub const ATTRIB_ACTION_OLDNAME: &str = "OldName";
pub const ATTRIB_ACTION_NEWNAME: &str = "NewName";

pub const ACTION_VERB_DELETE_CALPLUGIN: &str = "DeleteCalPlugin";
pub const ACTION_VERB_DELETE_TITLE: &str = "DeleteTitle";
pub const ACTION_VERB_RENAME_TITLE: &str = "RenameTitle";
pub const ACTION_VERB_DELETE_EVENT: &str = "DeleteEvent";
pub const ACTION_VERB_RENAME_EVENT: &str = "RenameEvent";
pub const ACTION_VERB_RENAME_DIV: &str = "RenameDivision";
pub const ACTION_VERB_RENAME_LEVEL: &str = "RenameLevel";
pub const ACTION_VERB_RENAME_VENUE: &str = "RenameVenue";

pub const TREE_CALSITE: &str = "CalSite";
pub const TREE_CALSITE_DESC: &str = "Desc";
pub const TREE_LOCCODE: &str = "LocCode";
pub const TREE_VENUECODE: &str = "VenueCode";
pub const ATTRIB_CALSITE_NAME: &str = "name";
pub const ATTRIB_CALSITE_SEARCH: &str = "search";
pub const ATTRIB_CALSITE_HELP: &str = "help";
pub const ATTRIB_LOCCODE_CODE: &str = "code";
pub const ATTRIB_LOCCODE_NAME: &str = "name";
pub const ATTRIB_VENUECODE_CODE: &str = "code";
pub const ATTRIB_VENUECODE_VENUE: &str = "venue";

pub const ATTRIB_VENUE_NAME: &str = "Name";
pub const ATTRIB_VENUE_LONGNAME: &str = "LongName";
pub const ATTRIB_VENUE_URL: &str = "URL";
pub const ATTRIB_VENUE_ICON: &str = "icon";
pub const ATTRIB_VENUE_LIFETIME_NAME: &str = "LifetimeName";

pub const ATTRIB_LIFETIME_NAME_NAME: &str = "Name";

pub const ATTRIB_MULTIQ_NAME: &str = "Name";
pub const ATTRIB_MULTIQ_SHORTNAME: &str = "SName";
pub const ATTRIB_MULTIQ_VALID_FROM: &str = "ValidFrom";
pub const ATTRIB_MULTIQ_VALID_TO: &str = "ValidTo";
pub const ATTRIB_MULTIQ_ITEM_DIV: &str = "Div";
pub const ATTRIB_MULTIQ_ITEM_LEVEL: &str = "Level";
pub const ATTRIB_MULTIQ_ITEM_EVENT: &str = "Event";

pub const ATTRIB_OTHERPTS_NAME: &str = "Name";
pub const ATTRIB_OTHERPTS_COUNT: &str = "Count";
pub const ATTRIB_OTHERPTS_DEFAULT: &str = "defValue";

pub const ATTRIB_DIVISION_NAME: &str = "Name";
pub const ATTRIB_DIVISION_SHORTNAME: &str = "ShortName";
pub const ATTRIB_LEVEL_NAME: &str = "Name";
pub const ATTRIB_LEVEL_SHORTNAME: &str = "ShortName";
pub const ATTRIB_SUBLEVEL_NAME: &str = "Name";
pub const ATTRIB_SUBLEVEL_SHORTNAME: &str = "ShortName";

pub const ATTRIB_TITLES_NAME: &str = "Name";
pub const ATTRIB_TITLES_LONGNAME: &str = "LongName";
pub const ATTRIB_TITLES_PREFIX: &str = "Prefix";
pub const ATTRIB_TITLES_VALIDFROM: &str = "ValidFrom";
pub const ATTRIB_TITLES_VALIDTO: &str = "ValidTo";
pub const ATTRIB_TITLES_MULTIPLE_STARTAT: &str = "MultipleStartAt";
pub const ATTRIB_TITLES_MULTIPLE_INC: &str = "MultipleIncrement";
pub const ATTRIB_TITLES_MULTIPLE_ONFIRST: &str = "MultipleOnFirst";
pub const ATTRIB_TITLES_MULTIPLE_STYLE: &str = "Style";
pub const ATTRIB_TITLES_MULTIPLE_SEP: &str = "Sep";

pub const ATTRIB_EVENT_NAME: &str = "Name";
pub const ATTRIB_EVENT_SHORTNAME: &str = "ShortName";
pub const ATTRIB_EVENT_HAS_TABLE: &str = "hasTable";
pub const ATTRIB_EVENT_HASPARTNER: &str = "hasPartner";
pub const ATTRIB_EVENT_HASSUBNAMES: &str = "hasSubNames";

pub const ATTRIB_SCORING_VALIDFROM: &str = "ValidFrom";
pub const ATTRIB_SCORING_VALIDTO: &str = "ValidTo";
pub const ATTRIB_SCORING_DIVISION: &str = "Division";
pub const ATTRIB_SCORING_LEVEL: &str = "Level";
pub const ATTRIB_SCORING_TYPE: &str = "type";
pub const ATTRIB_SCORING_DROPFRACTIONS: &str = "dropFractions";
pub const ATTRIB_SCORING_HAS_TABLE: &str = "hasTable";
pub const ATTRIB_SCORING_HASSUBNAMES: &str = "hasSubNames";
pub const ATTRIB_SCORING_TIMEFAULTS_CLEAN_Q: &str = "cleanQ";
pub const ATTRIB_SCORING_TIMEFAULTS_UNDER: &str = "underTF";
pub const ATTRIB_SCORING_TIMEFAULTS_OVER: &str = "overTF";
pub const ATTRIB_SCORING_TIMEFAULTS_TITLING_PTS: &str = "titlingPointsRawFaults";
pub const ATTRIB_SCORING_SUBTRACT_TIMEFAULTS: &str = "subtractTF";
pub const ATTRIB_SCORING_TF_MULTIPLIER: &str = "timeFault";
pub const ATTRIB_SCORING_OPENINGPTS: &str = "OpeningPts";
pub const ATTRIB_SCORING_CLOSINGPTS: &str = "ClosingPts";
pub const ATTRIB_SCORING_SUPERQ: &str = "superQ";
pub const ATTRIB_SCORING_SPEEDPTS: &str = "speedPts";
pub const ATTRIB_SCORING_BONUSPTS: &str = "bonusPts";

pub const ATTRIB_PLACE_INFO_PLACE: &str = "Place";
pub const ATTRIB_PLACE_INFO_VALUE: &str = "Value";
pub const ATTRIB_PLACE_INFO_MUSTQ: &str = "MustQ";

pub const ATTRIB_TITLE_POINTS_POINTS: &str = "Points";
pub const ATTRIB_TITLE_POINTS_FAULTS: &str = "Faults";
pub const ATTRIB_TITLE_POINTS_TYPE: &str = "Type";

pub const ATTRIB_LIFETIME_POINTS_NAME: &str = "Name";
pub const ATTRIB_LIFETIME_POINTS_SPEEDPTS: &str = "SpeedPts";
pub const ATTRIB_LIFETIME_POINTS_POINTS: &str = "Points";
pub const ATTRIB_LIFETIME_POINTS_FAULTS: &str = "Faults";

// Calendar / Training / Info
pub const ATTRIB_CAL_START: &str = "DateStart";
pub const ATTRIB_CAL_END: &str = "DateEnd";
pub const ATTRIB_CAL_OPENING: &str = "DateOpening";
pub const ATTRIB_CAL_DRAW: &str = "DateDraw";
pub const ATTRIB_CAL_CLOSING: &str = "DateClosing";
pub const ATTRIB_CAL_MAYBE: &str = "isTentative";
pub const ATTRIB_CAL_LOCATION: &str = "Location";
pub const ATTRIB_CAL_CLUB: &str = "Club";
pub const ATTRIB_CAL_VENUE: &str = "Venue";
pub const ATTRIB_CAL_ENTERED: &str = "Entered";
pub const ATTRIB_CAL_ACCOMMODATION: &str = "Acc";
pub const ATTRIB_CAL_CONFIRMATION: &str = "Confirm";
pub const ATTRIB_CAL_SECEMAIL: &str = "SecEmail";
pub const ATTRIB_CAL_PREMIUMURL: &str = "PremiumURL";
pub const ATTRIB_CAL_ONLINEURL: &str = "OnlineURL";
pub const ATTRIB_CAL_NOTE: &str = "Note";

pub const ATTRIB_TRAINING_DATE: &str = "Date";
pub const ATTRIB_TRAINING_NAME: &str = "Name";
pub const ATTRIB_TRAINING_SUBNAME: &str = "SubName";

pub const TREE_CLUBINFO: &str = "ClubInfo";
pub const TREE_JUDGEINFO: &str = "JudgeInfo";
pub const TREE_LOCATIONINFO: &str = "LocationInfo";
pub const ATTRIB_INFO_NAME: &str = "Name";
pub const ATTRIB_INFO_VISIBLE: &str = "Visible";

// Dog
pub const TREE_REGNAME: &str = "RegisteredName";
pub const TREE_BREED: &str = "Breed";
pub const TREE_NOTE: &str = "Note";
pub const TREE_EXISTING_PTS: &str = "ExistingPoints";
pub const TREE_REG_NUM: &str = "RegNum";
pub const TREE_TITLE: &str = "Title";
pub const TREE_TRIAL: &str = "Trial";
pub const TREE_LOCATION: &str = "Location";
pub const TREE_CLUB: &str = "Club";
pub const TREE_RUN: &str = "Run";

pub const ATTRIB_DOG_CALLNAME: &str = "CallName";
pub const ATTRIB_DOG_DOB: &str = "DOB";
pub const ATTRIB_DOG_DECEASED: &str = "Deceased";

pub const ATTRIB_EXISTING_PTS_DATE: &str = "Date";
pub const ATTRIB_EXISTING_PTS_TYPE: &str = "Type";
pub const ATTRIB_EXISTING_PTS_OTHER: &str = "Other";
pub const ATTRIB_EXISTING_PTS_VENUE: &str = "Venue";
pub const ATTRIB_EXISTING_PTS_MULTIQ: &str = "MultiQ";
pub const ATTRIB_EXISTING_PTS_DIV: &str = "Div";
pub const ATTRIB_EXISTING_PTS_LEVEL: &str = "Level";
pub const ATTRIB_EXISTING_PTS_EVENT: &str = "Event";
pub const ATTRIB_EXISTING_PTS_SUBNAME: &str = "SubName";
pub const ATTRIB_EXISTING_PTS_POINTS: &str = "Pts";

pub const ATTRIB_REG_NUM_VENUE: &str = "Venue";
pub const ATTRIB_REG_NUM_NUMBER: &str = "Number";
pub const ATTRIB_REG_NUM_HEIGHT: &str = "Height";
pub const ATTRIB_REG_NUM_RECEIVED: &str = "isReceived";

pub const ATTRIB_TITLE_VENUE: &str = "Venue";
pub const ATTRIB_TITLE_NAME: &str = "Name";
pub const ATTRIB_TITLE_DATE: &str = "Date";
pub const ATTRIB_TITLE_INSTANCE: &str = "instance";
pub const ATTRIB_TITLE_INSTANCE_SHOW: &str = "show";
pub const ATTRIB_TITLE_INSTANCE_STARTAT: &str = "startat";
pub const ATTRIB_TITLE_INSTANCE_INC: &str = "increment";
pub const ATTRIB_TITLE_INSTANCE_STYLE: &str = "style";
pub const ATTRIB_TITLE_INSTANCE_SEP: &str = "sep";
pub const ATTRIB_TITLE_RECEIVED: &str = "isReceived";
pub const ATTRIB_TITLE_HIDDEN: &str = "isHidden";

pub const ATTRIB_TRIAL_VERIFIED: &str = "Verified";
pub const ATTRIB_TRIAL_DEFAULT_DATE: &str = "Date";

pub const ATTRIB_CLUB_VENUE: &str = "Venue";
pub const ATTRIB_CLUB_PRIMARY: &str = "Primary";

pub const ATTRIB_RUN_DATE: &str = "Date";
pub const ATTRIB_RUN_DIVISION: &str = "Division";
pub const ATTRIB_RUN_LEVEL: &str = "Level";
pub const ATTRIB_RUN_HEIGHT: &str = "Height";
pub const ATTRIB_RUN_EVENT: &str = "Event";
pub const ATTRIB_RUN_SUBNAME: &str = "SubName";
pub const ATTRIB_RUN_CLUB: &str = "Club";
pub const ATTRIB_RUN_ATHOME: &str = "atHome";

pub const TREE_CONDITIONS: &str = "Conditions";
pub const TREE_JUDGE: &str = "Judge";
pub const TREE_HANDLER: &str = "Handler";
pub const TREE_PARTNER: &str = "Partner";
pub const ATTRIB_PARTNER_HANDLER: &str = "Handler";
pub const ATTRIB_PARTNER_DOG: &str = "Dog";
pub const ATTRIB_PARTNER_REGNUM: &str = "RegNum";

// Run scoring
pub const TREE_BY_TIME: &str = "ByTime";
pub const TREE_BY_OPENCLOSE: &str = "ByOpenClose";
pub const TREE_BY_POINTS: &str = "ByPoints";
pub const TREE_BY_SPEED: &str = "BySpeed";
pub const TREE_BY_PASS: &str = "ByPass";

pub const ATTRIB_SCORING_FAULTS: &str = "CourseFaults";
pub const ATTRIB_SCORING_TIME: &str = "Time";
pub const ATTRIB_SCORING_SCT: &str = "SCT";
pub const ATTRIB_SCORING_SCT2: &str = "SCT2";
pub const ATTRIB_SCORING_OBSTACLES: &str = "obstacles";
pub const ATTRIB_BY_TIME_YARDS: &str = "Yards";
pub const ATTRIB_BY_TIME_TABLE: &str = "Table";
pub const ATTRIB_BY_OPENCLOSE_NEEDOPEN: &str = "NeedOpenPts";
pub const ATTRIB_BY_OPENCLOSE_NEEDCLOSE: &str = "NeedClosePts";
pub const ATTRIB_BY_OPENCLOSE_GOTOPEN: &str = "OpenPts";
pub const ATTRIB_BY_OPENCLOSE_GOTCLOSE: &str = "ClosePts";
pub const ATTRIB_BY_POINTS_NEED: &str = "NeedPts";
pub const ATTRIB_BY_POINTS_GOT: &str = "Points";
pub const ATTRIB_SCORING_BONUSPTS_RUN: &str = "bonusPts";

// Placement
pub const TREE_PLACEMENT: &str = "Placement";
pub const TREE_PLACEMENT_OTHERPOINTS: &str = "OtherPoints";
pub const ATTRIB_PLACEMENT_Q: &str = "Q";
pub const ATTRIB_PLACEMENT_PLACE: &str = "Place";
pub const ATTRIB_PLACEMENT_INCLASS: &str = "InClass";
pub const ATTRIB_PLACEMENT_DOGSQD: &str = "DogsQd";
pub const ATTRIB_PLACEMENT_SCORE_PTS: &str = "scorePts";
pub const ATTRIB_PLACEMENT_TITLE_PTS: &str = "titlePts";
pub const ATTRIB_PLACEMENT_SPEED_PTS: &str = "speedPts";
pub const ATTRIB_PLACEMENT_OTHERPOINTS_NAME: &str = "Name";
pub const ATTRIB_PLACEMENT_OTHERPOINTS_POINTS: &str = "Points";

// Reference runs
pub const TREE_REF_RUN: &str = "ReferenceRun";
pub const TREE_REF_NAME: &str = "Name";
pub const TREE_REF_BREED: &str = "Breed";
pub const TREE_REF_SCORE: &str = "ScoreOrFaults";
pub const TREE_REF_NOTE: &str = "Note";
pub const ATTRIB_REF_RUN_Q: &str = "Q";
pub const ATTRIB_REF_RUN_PLACE: &str = "Place";
pub const ATTRIB_REF_RUN_TIME: &str = "Time";
pub const ATTRIB_REF_RUN_HEIGHT: &str = "Height";

pub const TREE_NOTES: &str = "Notes";
pub const TREE_FAULTS: &str = "Faults";
pub const TREE_OTHER: &str = "Other";
pub const TREE_RUN_LINK: &str = "Link";

// Wildcards used in scoring division/level scoping.
pub const WILDCARD_DIVISION: &str = "*";
pub const WILDCARD_LEVEL: &str = "*";
