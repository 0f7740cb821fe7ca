//! UPnP SOAP envelope building and response field extraction

use once_cell::sync::Lazy;
use regex::Regex;

/// A UPnP service on the zone player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub urn: &'static str,
    pub control_path: &'static str,
}

pub const AV_TRANSPORT: Service = Service {
    urn: "urn:schemas-upnp-org:service:AVTransport:1",
    control_path: "/MediaRenderer/AVTransport/Control",
};

pub const RENDERING_CONTROL: Service = Service {
    urn: "urn:schemas-upnp-org:service:RenderingControl:1",
    control_path: "/MediaRenderer/RenderingControl/Control",
};

static FAULT_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:\w+:)?errorCode>\s*([^<]*?)\s*</(?:\w+:)?errorCode>")
        .expect("static regex")
});

/// Value for the `SOAPACTION` header
pub fn soap_action(service: &Service, action: &str) -> String {
    format!("\"{}#{}\"", service.urn, action)
}

/// Build the request body for `action` with the given arguments, in order
pub fn envelope(service: &Service, action: &str, args: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in args {
        body.push_str(&format!("<{name}>{}</{name}>", escape_xml(value)));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" "#,
            r#"s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
            r#"<s:Body><u:{action} xmlns:u="{urn}">{body}</u:{action}></s:Body>"#,
            r#"</s:Envelope>"#
        ),
        action = action,
        urn = service.urn,
        body = body,
    )
}

/// Any element holding only text: (open name, text, close name)
static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:\w+:)?(\w+)(?:\s[^>]*)?>([^<]*)</(?:\w+:)?(\w+)>").expect("static regex")
});

/// Text content of the first `<tag>` element, ignoring any namespace prefix
pub fn extract_tag(xml: &str, tag: &str) -> Option<String> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .find(|caps| &caps[1] == tag && &caps[3] == tag)
        .map(|caps| unescape_xml(&caps[2]))
}

/// UPnP error code from a SOAP fault body
pub fn fault_code(xml: &str) -> Option<String> {
    FAULT_CODE
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
