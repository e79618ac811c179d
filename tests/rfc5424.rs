use chrono::{Duration, FixedOffset, TimeZone};
use syslogkit::rfc5424::{generate, parse_message};
use syslogkit::{
    Facility, MessageComponents, ParseError, ProcId, RfcVersion, Severity, StructuredElement,
};

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<FixedOffset> {
    FixedOffset::west_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
}

#[test]
fn parse_5424_no_structured_data() {
    let input = "<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - BOM'su root' failed for lonvick on /dev/pts/8";

    assert_eq!(
        parse_message(input).unwrap(),
        MessageComponents {
            rfc_version: RfcVersion::Rfc5424,
            facility: Facility::AUTH,
            severity: Severity::CRIT,
            timestamp: Some(ts(2003, 10, 11, 22, 14, 15) + Duration::milliseconds(3)),
            hostname: Some("mymachine.example.com".into()),
            tag: String::new(),
            pid: None,
            app_name: Some("su".into()),
            proc_id: None,
            msg_id: Some("ID47".into()),
            structured_data: vec![],
            message: "BOM'su root' failed for lonvick on /dev/pts/8".into(),
        }
    );
}

#[test]
fn parse_5424_multiple_structured_data() {
    let input = "<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"][examplePriority@32473 class=\"high\"] BOMAn application event log entry...";

    assert_eq!(
        parse_message(input).unwrap(),
        MessageComponents {
            rfc_version: RfcVersion::Rfc5424,
            facility: Facility::LOCAL4,
            severity: Severity::NOTICE,
            timestamp: Some(ts(2003, 10, 11, 22, 14, 15) + Duration::milliseconds(3)),
            hostname: Some("mymachine.example.com".into()),
            tag: String::new(),
            pid: None,
            app_name: Some("evntslog".into()),
            proc_id: None,
            msg_id: Some("ID47".into()),
            structured_data: vec![
                StructuredElement::new("exampleSDID@32473")
                    .param("iut", "3")
                    .param("eventSource", "Application")
                    .param("eventID", "1011"),
                StructuredElement::new("examplePriority@32473").param("class", "high"),
            ],
            message: "BOMAn application event log entry...".into(),
        }
    );
}

#[test]
fn parse_5424_structured_data_only_no_message() {
    let input = "<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [examplePriority@32473 class=\"high\"]";

    let components = parse_message(input).unwrap();
    assert_eq!(components.structured_data.len(), 1);
    assert_eq!(components.message, "");
}

#[test]
fn syslog_ng_network_syslog_protocol() {
    let msg = "i am foobar";
    let raw = format!(
        r#"<13>1 2019-02-13T19:48:34+00:00 74794bfb6795 root 8449 - {}{} {}"#,
        r#"[meta sequenceId="1" sysUpTime="37" language="EN"]"#,
        r#"[origin ip="192.168.0.1" software="test"]"#,
        msg
    );

    assert_eq!(
        parse_message(&raw).unwrap(),
        MessageComponents {
            rfc_version: RfcVersion::Rfc5424,
            facility: Facility::USER,
            severity: Severity::NOTICE,
            timestamp: Some(ts(2019, 2, 13, 19, 48, 34)),
            hostname: Some("74794bfb6795".into()),
            tag: String::new(),
            pid: None,
            app_name: Some("root".into()),
            proc_id: Some(ProcId::Pid(8449)),
            msg_id: None,
            structured_data: vec![
                StructuredElement::new("meta")
                    .param("sequenceId", "1")
                    .param("sysUpTime", "37")
                    .param("language", "EN"),
                StructuredElement::new("origin")
                    .param("ip", "192.168.0.1")
                    .param("software", "test"),
            ],
            message: "i am foobar".into(),
        }
    )
}

#[test]
fn logical_system_juniper_routers() {
    let raw = r#"<28>1 2020-05-22T14:59:09.250-03:00 OX-XXX-MX204 OX-XXX-CONTEUDO:rpd 6589 - - bgp_listen_accept: %DAEMON-4: Connection attempt from unconfigured neighbor: 2001:XXX::219:166+57284"#;

    let components = parse_message(raw).unwrap();
    assert_eq!(components.facility, Facility::DAEMON);
    assert_eq!(components.severity, Severity::WARNING);
    assert_eq!(
        components.timestamp,
        Some(
            FixedOffset::west_opt(3 * 3600)
                .unwrap()
                .with_ymd_and_hms(2020, 5, 22, 14, 59, 9)
                .unwrap()
                + Duration::microseconds(250_000)
        )
    );
    assert_eq!(components.hostname.as_deref(), Some("OX-XXX-MX204"));
    assert_eq!(components.app_name.as_deref(), Some("OX-XXX-CONTEUDO:rpd"));
    assert_eq!(components.proc_id, Some(ProcId::Pid(6589)));
    assert_eq!(
        components.message,
        "bgp_listen_accept: %DAEMON-4: Connection attempt from unconfigured neighbor: 2001:XXX::219:166+57284"
    );
}

#[test]
fn empty_sd_param_value() {
    let components = parse_message(r#"<29>1 2018-05-14T08:23:01.520Z leyal_test4 mgd 13894 UI_CHILD_EXITED [junos@2636.1.1.1.2.57 pid="14374" return-value="5" core-dump-status="" command="/usr/sbin/mustd"]"#).unwrap();

    assert_eq!(components.facility, Facility::DAEMON);
    assert_eq!(components.severity, Severity::NOTICE);
    assert_eq!(components.msg_id.as_deref(), Some("UI_CHILD_EXITED"));
    assert_eq!(
        components.structured_data,
        vec![StructuredElement::new("junos@2636.1.1.1.2.57")
            .param("pid", "14374")
            .param("return-value", "5")
            .param("core-dump-status", "")
            .param("command", "/usr/sbin/mustd")]
    );
    assert_eq!(components.message, "");
}

#[test]
fn rejects_rfc3164_shaped_input() {
    let result = parse_message("<134>Feb 18 20:53:31 haproxy[376]: I am a message");
    assert!(result.is_err());
}

#[test]
fn rejects_unsupported_version() {
    assert_eq!(
        parse_message("<165>2 2003-10-11T22:14:15.003Z host app - - - body"),
        Err(ParseError::UnsupportedVersion(2))
    );
}

#[test]
fn rejects_bad_timestamps() {
    for input in [
        "<1>1 2003-10-11 22:14:15Z host - - - -",
        "<1>1 2003-10-11T22:14:15 host - - - -",
        "<1>1 2003-08-24T05:14:15.000000003+07:00 host - - - -",
    ] {
        assert_eq!(
            parse_message(input),
            Err(ParseError::MalformedTimestamp),
            "input: {input}"
        );
    }
}

#[test]
fn round_trip_preserves_every_field() {
    let original = MessageComponents::builder(RfcVersion::Rfc5424)
        .facility(20)
        .severity(5)
        .timestamp(syslogkit::timestamp::parse_rfc3339("2023-12-01T10:30:45.123456Z").unwrap())
        .hostname("edge-router-7")
        .app_name("evntslog")
        .proc_id(8710)
        .msg_id("ID47")
        .structured_data(vec![
            StructuredElement::new("exampleSDID@32473")
                .param("iut", "3")
                .param("eventSource", "Application"),
            StructuredElement::new("meta").param("escape", r#"quote " slash \ bracket ]"#),
        ])
        .message("An application event log entry...")
        .build()
        .unwrap();

    let wire = generate(&original);
    assert_eq!(parse_message(&wire).unwrap(), original);
}

#[test]
fn round_trip_with_nil_fields() {
    let original = parse_message("<1>1 - - - - - -").unwrap();
    assert_eq!(parse_message(&generate(&original)).unwrap(), original);
}
