//! Frame building for the portal's captive network services.
//!
//! The portal answers every DNS question with its own address and hands out
//! leases from a tiny DHCP responder. Both builders are pure slice-in,
//! slice-out so they can be exercised without sockets.

/// Largest DNS response the portal will build: the echoed question section
/// plus one fixed-size A record.
pub const DNS_RESPONSE_MAX: usize = 512;

/// Fixed size of the replies built by [`build_dhcp_reply`].
pub const DHCP_REPLY_MAX: usize = 300;

const DNS_HEADER_LEN: usize = 12;
const DNS_ANSWER_LEN: usize = 16;

/// Answer any well-formed query with a single A record pointing at
/// `answer_ip`, echoing the question so the client can match it. Returns
/// the response length, or `None` when the packet is not a plain query.
pub fn build_dns_response(query: &[u8], answer_ip: [u8; 4], out: &mut [u8]) -> Option<usize> {
    if query.len() < DNS_HEADER_LEN {
        return None;
    }
    // QR must be 0 and opcode must be QUERY.
    if query[2] & 0xF8 != 0 {
        return None;
    }
    let qdcount = u16::from_be_bytes([query[4], query[5]]);
    if qdcount != 1 {
        return None;
    }

    // Walk the QNAME labels to find the end of the question section.
    let mut pos = DNS_HEADER_LEN;
    loop {
        let len = *query.get(pos)? as usize;
        if len == 0 {
            pos += 1;
            break;
        }
        // Compression pointers never appear in a question we would echo.
        if len & 0xC0 != 0 {
            return None;
        }
        pos += 1 + len;
    }
    // QTYPE and QCLASS.
    pos += 4;
    if pos > query.len() {
        return None;
    }
    let question_end = pos;

    let response_len = question_end + DNS_ANSWER_LEN;
    if response_len > out.len() {
        return None;
    }

    out[..question_end].copy_from_slice(&query[..question_end]);
    // QR + AA, preserving the client's RD bit.
    out[2] = 0x84 | (query[2] & 0x01);
    out[3] = 0x00;
    out[6..8].copy_from_slice(&1u16.to_be_bytes());
    out[8..12].fill(0);

    let answer = &mut out[question_end..response_len];
    // Name: pointer to the echoed QNAME at offset 12.
    answer[0] = 0xC0;
    answer[1] = 0x0C;
    // TYPE A, CLASS IN.
    answer[2..6].copy_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    // Short TTL so clients re-ask once they leave the portal network.
    answer[6..10].copy_from_slice(&60u32.to_be_bytes());
    answer[10..12].copy_from_slice(&4u16.to_be_bytes());
    answer[12..16].copy_from_slice(&answer_ip);

    Some(response_len)
}

const BOOTP_OP_REQUEST: u8 = 1;
const BOOTP_OP_REPLY: u8 = 2;
const BOOTP_HEADER_LEN: usize = 236;
const DHCP_MAGIC: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

const DHCP_DISCOVER: u8 = 1;
const DHCP_OFFER: u8 = 2;
const DHCP_REQUEST: u8 = 3;
const DHCP_ACK: u8 = 5;

const OPT_SUBNET_MASK: u8 = 1;
const OPT_ROUTER: u8 = 3;
const OPT_DNS: u8 = 6;
const OPT_LEASE_TIME: u8 = 51;
const OPT_MESSAGE_TYPE: u8 = 53;
const OPT_SERVER_ID: u8 = 54;
const OPT_END: u8 = 255;

#[derive(Clone, Copy, Debug)]
pub struct DhcpReplyParams {
    pub server_ip: [u8; 4],
    pub subnet_mask: [u8; 4],
    pub lease_secs: u32,
}

/// Assign each client a stable host number inside the portal /24, away
/// from the server's own address.
fn offered_host(chaddr: &[u8]) -> u8 {
    let sum: u8 = chaddr.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    10 + sum % 200
}

fn message_type(packet: &[u8]) -> Option<u8> {
    let mut pos = BOOTP_HEADER_LEN + DHCP_MAGIC.len();
    while pos < packet.len() {
        let code = packet[pos];
        if code == OPT_END {
            return None;
        }
        // Pad option has no length octet.
        if code == 0 {
            pos += 1;
            continue;
        }
        let len = *packet.get(pos + 1)? as usize;
        if code == OPT_MESSAGE_TYPE {
            return packet.get(pos + 2).copied();
        }
        pos += 2 + len;
    }
    None
}

/// Answer DISCOVER with OFFER and REQUEST with ACK; ignore everything else.
/// Returns the reply length, or `None` when no reply should be sent.
pub fn build_dhcp_reply(request: &[u8], params: &DhcpReplyParams, out: &mut [u8]) -> Option<usize> {
    if request.len() < BOOTP_HEADER_LEN + DHCP_MAGIC.len() || out.len() < DHCP_REPLY_MAX {
        return None;
    }
    if request[0] != BOOTP_OP_REQUEST {
        return None;
    }
    if request[BOOTP_HEADER_LEN..BOOTP_HEADER_LEN + 4] != DHCP_MAGIC {
        return None;
    }
    let reply_type = match message_type(request)? {
        DHCP_DISCOVER => DHCP_OFFER,
        DHCP_REQUEST => DHCP_ACK,
        _ => return None,
    };

    let mut offered = params.server_ip;
    offered[3] = offered_host(&request[28..34]);

    let reply = &mut out[..DHCP_REPLY_MAX];
    reply.fill(0);
    reply[0] = BOOTP_OP_REPLY;
    // htype/hlen: Ethernet.
    reply[1] = 1;
    reply[2] = 6;
    // xid and flags echoed from the request so broadcast replies work.
    reply[4..8].copy_from_slice(&request[4..8]);
    reply[10..12].copy_from_slice(&request[10..12]);
    // yiaddr and siaddr.
    reply[16..20].copy_from_slice(&offered);
    reply[20..24].copy_from_slice(&params.server_ip);
    // chaddr.
    reply[28..44].copy_from_slice(&request[28..44]);
    reply[BOOTP_HEADER_LEN..BOOTP_HEADER_LEN + 4].copy_from_slice(&DHCP_MAGIC);

    let mut pos = BOOTP_HEADER_LEN + DHCP_MAGIC.len();
    let mut put = |reply: &mut [u8], code: u8, data: &[u8]| {
        reply[pos] = code;
        reply[pos + 1] = data.len() as u8;
        reply[pos + 2..pos + 2 + data.len()].copy_from_slice(data);
        pos += 2 + data.len();
    };
    put(reply, OPT_MESSAGE_TYPE, &[reply_type]);
    put(reply, OPT_SERVER_ID, &params.server_ip);
    put(reply, OPT_LEASE_TIME, &params.lease_secs.to_be_bytes());
    put(reply, OPT_SUBNET_MASK, &params.subnet_mask);
    put(reply, OPT_ROUTER, &params.server_ip);
    put(reply, OPT_DNS, &params.server_ip);
    reply[pos] = OPT_END;

    Some(DHCP_REPLY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTAL_IP: [u8; 4] = [192, 168, 4, 1];

    fn a_query(name_labels: &[&str]) -> heapless::Vec<u8, 128> {
        let mut query = heapless::Vec::new();
        // id 0x1234, RD set, one question.
        query.extend_from_slice(&[0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0])
            .unwrap();
        for label in name_labels {
            query.push(label.len() as u8).unwrap();
            query.extend_from_slice(label.as_bytes()).unwrap();
        }
        query.push(0).unwrap();
        // QTYPE A, QCLASS IN.
        query.extend_from_slice(&[0, 1, 0, 1]).unwrap();
        query
    }

    #[test]
    fn dns_answers_any_name_with_the_portal_address() {
        let query = a_query(&["connectivitycheck", "gstatic", "com"]);
        let mut out = [0u8; DNS_RESPONSE_MAX];
        let len = build_dns_response(&query, PORTAL_IP, &mut out).unwrap();

        assert_eq!(len, query.len() + 16);
        // Echoed id, response flags, one answer.
        assert_eq!(&out[0..2], &[0x12, 0x34]);
        assert_eq!(out[2], 0x85);
        assert_eq!(&out[6..8], &[0, 1]);
        // The answer ends with the portal address.
        assert_eq!(&out[len - 4..len], &PORTAL_IP);
        // Question section is echoed untouched.
        assert_eq!(&out[12..query.len()], &query[12..]);
    }

    #[test]
    fn dns_ignores_responses_and_truncated_packets() {
        let mut query: heapless::Vec<u8, 128> = a_query(&["example", "com"]);
        query[2] |= 0x80;
        let mut out = [0u8; DNS_RESPONSE_MAX];
        assert!(build_dns_response(&query, PORTAL_IP, &mut out).is_none());
        assert!(build_dns_response(&[0u8; 4], PORTAL_IP, &mut out).is_none());

        let truncated = a_query(&["example", "com"]);
        assert!(build_dns_response(&truncated[..truncated.len() - 3], PORTAL_IP, &mut out)
            .is_none());
    }

    fn dhcp_request(message_type: u8, mac: [u8; 6]) -> [u8; 300] {
        let mut packet = [0u8; 300];
        packet[0] = BOOTP_OP_REQUEST;
        packet[1] = 1;
        packet[2] = 6;
        packet[4..8].copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
        packet[28..34].copy_from_slice(&mac);
        packet[236..240].copy_from_slice(&DHCP_MAGIC);
        packet[240..243].copy_from_slice(&[OPT_MESSAGE_TYPE, 1, message_type]);
        packet[243] = OPT_END;
        packet
    }

    fn params() -> DhcpReplyParams {
        DhcpReplyParams {
            server_ip: PORTAL_IP,
            subnet_mask: [255, 255, 255, 0],
            lease_secs: 7_200,
        }
    }

    fn option_value<'a>(reply: &'a [u8], wanted: u8) -> Option<&'a [u8]> {
        let mut pos = 240;
        while pos < reply.len() && reply[pos] != OPT_END {
            let code = reply[pos];
            let len = reply[pos + 1] as usize;
            if code == wanted {
                return Some(&reply[pos + 2..pos + 2 + len]);
            }
            pos += 2 + len;
        }
        None
    }

    #[test]
    fn discover_gets_an_offer_in_the_portal_subnet() {
        let mac = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];
        let request = dhcp_request(DHCP_DISCOVER, mac);
        let mut out = [0u8; DHCP_REPLY_MAX];
        let len = build_dhcp_reply(&request, &params(), &mut out).unwrap();
        let reply = &out[..len];

        assert_eq!(reply[0], BOOTP_OP_REPLY);
        assert_eq!(&reply[4..8], &request[4..8]);
        assert_eq!(&reply[16..19], &PORTAL_IP[..3]);
        assert_ne!(reply[19], PORTAL_IP[3]);
        assert_eq!(&reply[28..34], &mac);
        assert_eq!(option_value(reply, OPT_MESSAGE_TYPE), Some(&[DHCP_OFFER][..]));
        assert_eq!(option_value(reply, OPT_SERVER_ID), Some(&PORTAL_IP[..]));
        assert_eq!(option_value(reply, OPT_DNS), Some(&PORTAL_IP[..]));
    }

    #[test]
    fn request_is_acked_with_the_same_address_as_the_offer() {
        let mac = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];
        let mut offer = [0u8; DHCP_REPLY_MAX];
        let mut ack = [0u8; DHCP_REPLY_MAX];
        build_dhcp_reply(&dhcp_request(DHCP_DISCOVER, mac), &params(), &mut offer).unwrap();
        build_dhcp_reply(&dhcp_request(DHCP_REQUEST, mac), &params(), &mut ack).unwrap();

        assert_eq!(&offer[16..20], &ack[16..20]);
        assert_eq!(option_value(&ack, OPT_MESSAGE_TYPE), Some(&[DHCP_ACK][..]));
    }

    #[test]
    fn distinct_clients_get_distinct_addresses() {
        let mut first = [0u8; DHCP_REPLY_MAX];
        let mut second = [0u8; DHCP_REPLY_MAX];
        build_dhcp_reply(
            &dhcp_request(DHCP_DISCOVER, [0x02, 0, 0, 0, 0, 1]),
            &params(),
            &mut first,
        )
        .unwrap();
        build_dhcp_reply(
            &dhcp_request(DHCP_DISCOVER, [0x02, 0, 0, 0, 0, 2]),
            &params(),
            &mut second,
        )
        .unwrap();
        assert_ne!(first[19], second[19]);
    }

    #[test]
    fn non_dhcp_traffic_is_ignored() {
        let mut out = [0u8; DHCP_REPLY_MAX];
        // Too short.
        assert!(build_dhcp_reply(&[0u8; 64], &params(), &mut out).is_none());
        // A reply, not a request.
        let mut reply_packet = dhcp_request(DHCP_DISCOVER, [0; 6]);
        reply_packet[0] = BOOTP_OP_REPLY;
        assert!(build_dhcp_reply(&reply_packet, &params(), &mut out).is_none());
        // Missing magic cookie.
        let mut no_magic = dhcp_request(DHCP_DISCOVER, [0; 6]);
        no_magic[236..240].fill(0);
        assert!(build_dhcp_reply(&no_magic, &params(), &mut out).is_none());
        // A RELEASE needs no reply.
        assert!(build_dhcp_reply(&dhcp_request(7, [0; 6]), &params(), &mut out).is_none());
    }
}
