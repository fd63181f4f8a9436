#![allow(dead_code)]

use build_map_loader::constants::{CRYPT_MARKER, EXTENDED_MAGIC, EXTRA_HEADER_SIZE};
use build_map_loader::crypt::{crypt, RecordKeys};
use build_map_loader::{ExtraSizes, Sector, Sprite, StartPosition, Wall};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn encode_sector(s: &Sector) -> Vec<u8> {
    let mut out = Vec::with_capacity(40);
    out.extend_from_slice(&s.wallptr.to_le_bytes());
    out.extend_from_slice(&s.wallnum.to_le_bytes());
    out.extend_from_slice(&s.ceilingz.to_le_bytes());
    out.extend_from_slice(&s.floorz.to_le_bytes());
    out.extend_from_slice(&s.ceilingstat.to_le_bytes());
    out.extend_from_slice(&s.floorstat.to_le_bytes());
    out.extend_from_slice(&s.ceilingpicnum.to_le_bytes());
    out.extend_from_slice(&s.ceilingheinum.to_le_bytes());
    out.extend_from_slice(&s.ceilingshade.to_le_bytes());
    out.extend_from_slice(&[s.ceilingpal, s.ceilingxpanning, s.ceilingypanning]);
    out.extend_from_slice(&s.floorpicnum.to_le_bytes());
    out.extend_from_slice(&s.floorheinum.to_le_bytes());
    out.extend_from_slice(&s.floorshade.to_le_bytes());
    out.extend_from_slice(&[s.floorpal, s.floorxpanning, s.floorypanning]);
    out.extend_from_slice(&[s.visibility, s.fogpal]);
    out.extend_from_slice(&s.lotag.to_le_bytes());
    out.extend_from_slice(&s.hitag.to_le_bytes());
    out.extend_from_slice(&s.extra.to_le_bytes());
    assert_eq!(out.len(), 40);
    out
}

pub fn encode_wall(w: &Wall) -> Vec<u8> {
    let mut out = Vec::with_capacity(32);
    out.extend_from_slice(&w.x.to_le_bytes());
    out.extend_from_slice(&w.y.to_le_bytes());
    out.extend_from_slice(&w.point2.to_le_bytes());
    out.extend_from_slice(&w.nextwall.to_le_bytes());
    out.extend_from_slice(&w.nextsector.to_le_bytes());
    out.extend_from_slice(&w.cstat.to_le_bytes());
    out.extend_from_slice(&w.picnum.to_le_bytes());
    out.extend_from_slice(&w.overpicnum.to_le_bytes());
    out.extend_from_slice(&w.shade.to_le_bytes());
    out.extend_from_slice(&[w.pal, w.xrepeat, w.yrepeat, w.xpanning, w.ypanning]);
    out.extend_from_slice(&w.lotag.to_le_bytes());
    out.extend_from_slice(&w.hitag.to_le_bytes());
    out.extend_from_slice(&w.extra.to_le_bytes());
    assert_eq!(out.len(), 32);
    out
}

pub fn encode_sprite(s: &Sprite) -> Vec<u8> {
    let mut out = Vec::with_capacity(44);
    out.extend_from_slice(&s.x.to_le_bytes());
    out.extend_from_slice(&s.y.to_le_bytes());
    out.extend_from_slice(&s.z.to_le_bytes());
    out.extend_from_slice(&s.cstat.to_le_bytes());
    out.extend_from_slice(&s.picnum.to_le_bytes());
    out.extend_from_slice(&s.shade.to_le_bytes());
    out.extend_from_slice(&[s.pal, s.clipdist, s.blend, s.xrepeat, s.yrepeat]);
    out.extend_from_slice(&s.xoffset.to_le_bytes());
    out.extend_from_slice(&s.yoffset.to_le_bytes());
    for value in [
        s.sectnum, s.statnum, s.ang, s.owner, s.xvel, s.yvel, s.zvel, s.lotag, s.hitag, s.extra,
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    assert_eq!(out.len(), 44);
    out
}

pub fn random_sector(rng: &mut StdRng) -> Sector {
    Sector {
        wallptr: rng.gen(),
        wallnum: rng.gen(),
        ceilingz: rng.gen(),
        floorz: rng.gen(),
        ceilingstat: rng.gen(),
        floorstat: rng.gen(),
        ceilingpicnum: rng.gen(),
        ceilingheinum: rng.gen(),
        ceilingshade: rng.gen(),
        ceilingpal: rng.gen(),
        ceilingxpanning: rng.gen(),
        ceilingypanning: rng.gen(),
        floorpicnum: rng.gen(),
        floorheinum: rng.gen(),
        floorshade: rng.gen(),
        floorpal: rng.gen(),
        floorxpanning: rng.gen(),
        floorypanning: rng.gen(),
        visibility: rng.gen(),
        fogpal: rng.gen(),
        lotag: rng.gen(),
        hitag: rng.gen(),
        extra: rng.gen_range(-1..3),
    }
}

pub fn random_wall(rng: &mut StdRng) -> Wall {
    Wall {
        x: rng.gen(),
        y: rng.gen(),
        point2: rng.gen(),
        nextwall: rng.gen(),
        nextsector: rng.gen(),
        cstat: rng.gen(),
        picnum: rng.gen(),
        overpicnum: rng.gen(),
        shade: rng.gen(),
        pal: rng.gen(),
        xrepeat: rng.gen(),
        yrepeat: rng.gen(),
        xpanning: rng.gen(),
        ypanning: rng.gen(),
        lotag: rng.gen(),
        hitag: rng.gen(),
        extra: rng.gen_range(-1..3),
    }
}

pub fn random_sprite(rng: &mut StdRng) -> Sprite {
    Sprite {
        x: rng.gen(),
        y: rng.gen(),
        z: rng.gen(),
        cstat: rng.gen(),
        picnum: rng.gen(),
        shade: rng.gen(),
        pal: rng.gen(),
        clipdist: rng.gen(),
        blend: rng.gen(),
        xrepeat: rng.gen(),
        yrepeat: rng.gen(),
        xoffset: rng.gen(),
        yoffset: rng.gen(),
        sectnum: rng.gen(),
        statnum: rng.gen(),
        ang: rng.gen_range(0..2048),
        owner: rng.gen(),
        xvel: rng.gen(),
        yvel: rng.gen(),
        zvel: rng.gen(),
        lotag: rng.gen(),
        hitag: rng.gen(),
        extra: rng.gen_range(-1..3),
    }
}

// The smallest sensible map: one square room
pub fn square_room() -> MapBuilder {
    let corners = [(0, 0), (1024, 0), (1024, 1024), (0, 1024)];
    let walls = corners
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Wall {
            x,
            y,
            point2: ((i + 1) % 4) as i16,
            nextwall: -1,
            nextsector: -1,
            ..Wall::default()
        })
        .collect();

    MapBuilder {
        start: StartPosition {
            x: 512,
            y: 512,
            z: 0,
            ang: 1536,
            sector: 0,
        },
        sectors: vec![Sector {
            wallptr: 0,
            wallnum: 4,
            ceilingz: 0,
            floorz: 8192,
            ..Sector::default()
        }],
        walls,
        sprites: Vec::new(),
    }
}

// A map with random records
pub fn random_map(seed: u64, sectors: usize, walls: usize, sprites: usize) -> MapBuilder {
    let mut rng = StdRng::seed_from_u64(seed);

    MapBuilder {
        start: StartPosition {
            x: rng.gen(),
            y: rng.gen(),
            z: rng.gen(),
            ang: rng.gen_range(0..2048),
            sector: rng.gen_range(0..sectors.max(1) as i16),
        },
        sectors: (0..sectors).map(|_| random_sector(&mut rng)).collect(),
        walls: (0..walls).map(|_| random_wall(&mut rng)).collect(),
        sprites: (0..sprites).map(|_| random_sprite(&mut rng)).collect(),
    }
}

// Extended header settings not derived from the records themselves
#[derive(Debug, Clone)]
pub struct ExtendedOptions {
    pub version: u16,
    pub song_id: u32,
    pub encrypt_header: bool,
    pub revision: u32,
    pub visibility: i32,
    pub parallax_type: u8,
    pub sky_bits: i16,
    pub pskyoff: Vec<i16>,
    pub extra_sizes: ExtraSizes,         // Written only for the encrypted sub-version
    pub counts: Option<(u16, u16, u16)>, // Override the declared counts
}

impl Default for ExtendedOptions {
    fn default() -> Self {
        ExtendedOptions {
            version: 0x0701,
            song_id: 0,
            encrypt_header: false,
            revision: 1,
            visibility: 0,
            parallax_type: 0,
            sky_bits: 0,
            pskyoff: Vec::new(),
            extra_sizes: ExtraSizes::default(),
            counts: None,
        }
    }
}

pub struct MapBuilder {
    pub start: StartPosition,
    pub sectors: Vec<Sector>,
    pub walls: Vec<Wall>,
    pub sprites: Vec<Sprite>,
}

impl MapBuilder {
    pub fn empty() -> MapBuilder {
        MapBuilder {
            start: StartPosition::default(),
            sectors: Vec::new(),
            walls: Vec::new(),
            sprites: Vec::new(),
        }
    }

    fn write_start(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.start.x.to_le_bytes());
        out.extend_from_slice(&self.start.y.to_le_bytes());
        out.extend_from_slice(&self.start.z.to_le_bytes());
        out.extend_from_slice(&self.start.ang.to_le_bytes());
        out.extend_from_slice(&self.start.sector.to_le_bytes());
    }

    pub fn classic(&self, version: i32) -> Vec<u8> {
        let mut out = version.to_le_bytes().to_vec();
        self.write_start(&mut out);

        out.extend_from_slice(&(self.sectors.len() as u16).to_le_bytes());
        for sector in &self.sectors {
            out.extend(encode_sector(sector));
        }
        out.extend_from_slice(&(self.walls.len() as u16).to_le_bytes());
        for wall in &self.walls {
            out.extend(encode_wall(wall));
        }
        out.extend_from_slice(&(self.sprites.len() as u16).to_le_bytes());
        for sprite in &self.sprites {
            out.extend(encode_sprite(sprite));
        }

        out
    }

    pub fn extended(&self, options: &ExtendedOptions) -> Vec<u8> {
        let encrypted = options.version & 0xff == 0;
        let counts = (
            self.sectors.len() as u16,
            self.walls.len() as u16,
            self.sprites.len() as u16,
        );
        let (numsectors, numwalls, numsprites) = options.counts.unwrap_or(counts);

        let mut out = EXTENDED_MAGIC.to_le_bytes().to_vec();
        out.extend_from_slice(&options.version.to_le_bytes());

        let mut header = Vec::with_capacity(37);
        self.write_start(&mut header);
        header.extend_from_slice(&options.sky_bits.to_le_bytes());
        header.extend_from_slice(&options.visibility.to_le_bytes());
        header.extend_from_slice(&options.song_id.to_le_bytes());
        header.push(options.parallax_type);
        header.extend_from_slice(&options.revision.to_le_bytes());
        header.extend_from_slice(&numsectors.to_le_bytes());
        header.extend_from_slice(&numwalls.to_le_bytes());
        header.extend_from_slice(&numsprites.to_le_bytes());
        assert_eq!(header.len(), 37);
        if options.encrypt_header {
            crypt(&mut header, CRYPT_MARKER);
        }
        out.extend(header);

        let mut sizes = ExtraSizes::default();
        if encrypted {
            sizes = options.extra_sizes;
            let mut extra = vec![0u8; EXTRA_HEADER_SIZE];
            extra[64..68].copy_from_slice(&sizes.sprite.to_le_bytes());
            extra[68..72].copy_from_slice(&sizes.wall.to_le_bytes());
            extra[72..76].copy_from_slice(&sizes.sector.to_le_bytes());
            crypt(&mut extra, numwalls as u32);
            out.extend(extra);
        }

        for offset in &options.pskyoff {
            out.extend_from_slice(&offset.to_le_bytes());
        }

        let keys = RecordKeys::from_revision(options.revision);
        let mut push_record = |mut record: Vec<u8>, key: u32, extra: i16, trailer: u32| {
            if encrypted {
                crypt(&mut record, key);
            }
            out.extend(record);
            if extra > 0 {
                out.extend(std::iter::repeat(0xee).take(trailer as usize));
            }
        };

        for sector in &self.sectors {
            let record = encode_sector(sector);
            push_record(record, keys.sector, sector.extra, sizes.sector);
        }
        for wall in &self.walls {
            let record = encode_wall(wall);
            push_record(record, keys.wall, wall.extra, sizes.wall);
        }
        for sprite in &self.sprites {
            let record = encode_sprite(sprite);
            push_record(record, keys.sprite, sprite.extra, sizes.sprite);
        }

        out
    }
}
