//! Ranked preference lists (cipher, key exchange, host key and GSSAPI
//! library order).
//!
//! A list is stored as comma separated symbolic names. Parsing drops
//! unknown and repeated names, then appends every id the user's list did
//! not mention so that options added after the list was saved still show up.

/// Where an id missing from a stored list is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the end of the list
    End,
    /// Immediately before another id (end of list if that id is absent)
    Before(i32),
    /// Immediately after another id (end of list if that id is absent)
    After(i32),
}

#[derive(Debug, Clone, Copy)]
pub struct PrefEntry {
    pub name: &'static str,
    pub id: i32,
    pub placement: Placement,
}

/// Static name <-> id table for one preference list
#[derive(Debug)]
pub struct PrefTable {
    pub key: &'static str,
    pub entries: &'static [PrefEntry],
    pub default: &'static str,
}

impl PrefTable {
    pub fn id_of(&self, name: &str) -> Option<i32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.id)
    }

    pub fn name_of(&self, id: i32) -> Option<&'static str> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.name)
    }

    /// Parse a stored list into a complete ranked id list
    pub fn parse(&self, text: &str) -> Vec<i32> {
        let mut ids: Vec<i32> = Vec::with_capacity(self.entries.len());
        for name in text.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match self.id_of(name) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => log::debug!("Dropping unknown {} entry '{}'", self.key, name),
            }
        }

        for entry in self.entries {
            if ids.contains(&entry.id) {
                continue;
            }
            let position = match entry.placement {
                Placement::End => None,
                Placement::Before(other) => ids.iter().position(|&id| id == other),
                Placement::After(other) => ids.iter().position(|&id| id == other).map(|p| p + 1),
            };
            match position {
                Some(p) => ids.insert(p, entry.id),
                None => ids.push(entry.id),
            }
        }
        ids
    }

    /// Serialize an id list as comma separated names; unknown ids are skipped
    pub fn serialize(&self, ids: &[i32]) -> String {
        ids.iter()
            .filter_map(|&id| self.name_of(id))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The default ranked list
    pub fn defaults(&self) -> Vec<i32> {
        self.parse(self.default)
    }
}

/// Marker separating acceptable options from those that warrant a warning
pub const WARN: i32 = 0;

pub const CIPHER_3DES: i32 = 1;
pub const CIPHER_BLOWFISH: i32 = 2;
pub const CIPHER_AES: i32 = 3;
pub const CIPHER_DES: i32 = 4;
pub const CIPHER_ARCFOUR: i32 = 5;
pub const CIPHER_CHACHA20: i32 = 6;
pub const CIPHER_AESGCM: i32 = 7;

pub static CIPHERS: PrefTable = PrefTable {
    key: "Cipher",
    entries: &[
        PrefEntry { name: "aes", id: CIPHER_AES, placement: Placement::End },
        PrefEntry { name: "chacha20", id: CIPHER_CHACHA20, placement: Placement::Before(CIPHER_AES) },
        PrefEntry { name: "aesgcm", id: CIPHER_AESGCM, placement: Placement::After(CIPHER_CHACHA20) },
        PrefEntry { name: "3des", id: CIPHER_3DES, placement: Placement::End },
        PrefEntry { name: "WARN", id: WARN, placement: Placement::End },
        PrefEntry { name: "des", id: CIPHER_DES, placement: Placement::End },
        PrefEntry { name: "blowfish", id: CIPHER_BLOWFISH, placement: Placement::End },
        PrefEntry { name: "arcfour", id: CIPHER_ARCFOUR, placement: Placement::End },
    ],
    default: "aes,chacha20,aesgcm,3des,WARN,des,blowfish,arcfour",
};

pub const KEX_DHGROUP1: i32 = 1;
pub const KEX_DHGROUP14: i32 = 2;
pub const KEX_DHGEX: i32 = 3;
pub const KEX_RSA: i32 = 4;
pub const KEX_ECDH: i32 = 5;
pub const KEX_NTRU_HYBRID: i32 = 6;

pub static KEX: PrefTable = PrefTable {
    key: "KEX",
    entries: &[
        PrefEntry { name: "ecdh", id: KEX_ECDH, placement: Placement::End },
        PrefEntry { name: "ntru-curve25519", id: KEX_NTRU_HYBRID, placement: Placement::Before(KEX_ECDH) },
        PrefEntry { name: "dh-gex-sha1", id: KEX_DHGEX, placement: Placement::End },
        PrefEntry { name: "dh-group14-sha1", id: KEX_DHGROUP14, placement: Placement::End },
        PrefEntry { name: "rsa", id: KEX_RSA, placement: Placement::End },
        PrefEntry { name: "WARN", id: WARN, placement: Placement::End },
        PrefEntry { name: "dh-group1-sha1", id: KEX_DHGROUP1, placement: Placement::End },
    ],
    default: "ntru-curve25519,ecdh,dh-gex-sha1,dh-group14-sha1,rsa,WARN,dh-group1-sha1",
};

pub const HK_ED25519: i32 = 1;
pub const HK_ED448: i32 = 2;
pub const HK_ECDSA: i32 = 3;
pub const HK_RSA: i32 = 4;
pub const HK_DSA: i32 = 5;

pub static HOST_KEYS: PrefTable = PrefTable {
    key: "HostKey",
    entries: &[
        PrefEntry { name: "ed25519", id: HK_ED25519, placement: Placement::End },
        PrefEntry { name: "ed448", id: HK_ED448, placement: Placement::After(HK_ED25519) },
        PrefEntry { name: "ecdsa", id: HK_ECDSA, placement: Placement::End },
        PrefEntry { name: "rsa", id: HK_RSA, placement: Placement::End },
        PrefEntry { name: "dsa", id: HK_DSA, placement: Placement::End },
        PrefEntry { name: "WARN", id: WARN, placement: Placement::End },
    ],
    default: "ed25519,ed448,ecdsa,rsa,dsa,WARN",
};

pub const GSSLIB_GSSAPI32: i32 = 0;
pub const GSSLIB_SSPI: i32 = 1;
pub const GSSLIB_CUSTOM: i32 = 2;

pub static GSS_LIBS: PrefTable = PrefTable {
    key: "GSSLibs",
    entries: &[
        PrefEntry { name: "gssapi32", id: GSSLIB_GSSAPI32, placement: Placement::End },
        PrefEntry { name: "sspi", id: GSSLIB_SSPI, placement: Placement::End },
        PrefEntry { name: "custom", id: GSSLIB_CUSTOM, placement: Placement::End },
    ],
    default: "gssapi32,sspi,custom",
};
