use std::path::Path;

use anyhow::{Context, Result, bail};
use image::{Rgb, RgbImage};

/// SplitMix64: one word of state, reproducible sample files.
struct SampleRng(u64);

impl SampleRng {
    fn below(&mut self, n: usize) -> usize {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        ((z ^ (z >> 31)) % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const HEADERS: [&str; 14] = [
    "アイドル名",
    "画像パス",
    "スキル",
    "属性",
    "特化",
    "秒数",
    "確率",
    "センター効果",
    "Vo",
    "Da",
    "Vi",
    "メモリアルガシャ",
    "副属性",
    "ドミナント",
];

const NAMES: [&str; 12] = [
    "島村卯月", "渋谷凛", "本田未央", "小日向美穂", "高垣楓", "城ヶ崎美嘉",
    "佐久間まゆ", "神崎蘭子", "鷺沢文香", "一ノ瀬志希", "堀裕子", "星輝子",
];
const SKILLS: [&str; 5] = [
    "スコアアップ",
    "コンボボーナス",
    "オーバーロード",
    "ドミナント・ハーモニー",
    "ミューチャル",
];
const ATTRIBUTES: [&str; 3] = ["Cu", "Co", "Pa"];
const SINGLE: [&str; 3] = ["ボーカル", "ダンス", "ビジュアル"];
const DUAL: [&str; 3] = ["ボーカル&ダンス", "ダンス&ビジュアル", "ビジュアル&ボーカル"];
const SECONDS: [&str; 4] = ["6", "7", "9", "11"];
const TIERS: [&str; 3] = ["低", "中", "高"];

fn attribute_color(attribute: &str) -> Rgb<u8> {
    match attribute {
        "Cu" => Rgb([0xf6, 0x6d, 0xa8]),
        "Co" => Rgb([0x4d, 0x8d, 0xf0]),
        _ => Rgb([0xf5, 0xb0, 0x2e]),
    }
}

/// Solid portrait with a lighter border; good enough to see the layout.
fn write_portrait(path: &Path, color: Rgb<u8>) -> Result<()> {
    let img = RgbImage::from_fn(96, 120, |x, y| {
        if x < 4 || y < 4 || x >= 92 || y >= 116 {
            Rgb([0xff, 0xff, 0xff])
        } else {
            color
        }
    });
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let out_dir = Path::new("sample");
    std::fs::create_dir_all(out_dir.join("img")).context("creating sample/img")?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    let mut rows = 0;
    let mut portraits = 0;
    for (i, name) in NAMES.iter().enumerate() {
        for card in 0..3 {
            let skill = rng.pick(&SKILLS);
            let attribute = rng.pick(&ATTRIBUTES);
            let dual = matches!(skill, "ドミナント・ハーモニー" | "ミューチャル");
            let specialty = if dual { rng.pick(&DUAL) } else { rng.pick(&SINGLE) };
            let image = format!("img/{i:02}_{card}.png");

            // Every fourth card is left without a portrait on purpose.
            if (i + card) % 4 != 0 {
                write_portrait(&out_dir.join(&image), attribute_color(attribute))?;
                portraits += 1;
            }

            let display_name = if card == 0 {
                name.to_string()
            } else {
                format!("[{}枚目]<br>{name}", card + 1)
            };
            let stat = |rng: &mut SampleRng| (4000 + rng.below(4000)).to_string();
            let (vo, da, vi) = (stat(&mut rng), stat(&mut rng), stat(&mut rng));
            let memorial = if rng.below(3) == 0 {
                format!("メモリアル{}", 1 + rng.below(9))
            } else {
                String::new()
            };
            let (sub, dominant) = if skill == "ドミナント・ハーモニー" {
                (rng.pick(&ATTRIBUTES).to_string(), rng.pick(&SINGLE).to_string())
            } else {
                (String::new(), String::new())
            };

            writer.write_record([
                display_name.as_str(),
                image.as_str(),
                skill,
                attribute,
                specialty,
                rng.pick(&SECONDS),
                rng.pick(&TIERS),
                "全員のアピール値30%アップ",
                vo.as_str(),
                da.as_str(),
                vi.as_str(),
                memorial.as_str(),
                sub.as_str(),
                dominant.as_str(),
            ])?;
            rows += 1;
        }
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?;
    let text = String::from_utf8(buffer)?;
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
    if had_errors {
        bail!("sample text is not representable in Shift_JIS");
    }
    let output_path = out_dir.join("idol-list.csv");
    std::fs::write(&output_path, &bytes)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!(
        "Wrote {rows} idols and {portraits} portraits to {}",
        output_path.display()
    );
    Ok(())
}
