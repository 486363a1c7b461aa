use crate::error::{BvhError, Result};
use crate::motion;
use crate::options::ParseOptions;
use crate::tokenize::{Field, Line, TokenStream};
use crate::types::*;
use std::path::Path;
use std::str::FromStr;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn grammar_error(expected: impl Into<String>, found: &Line) -> BvhError {
    BvhError::Grammar {
        expected: expected.into(),
        found: found.text(),
        line: found.number,
        column: found.first().column,
    }
}

fn grammar_error_at(expected: impl Into<String>, field: Field, line: usize) -> BvhError {
    BvhError::Grammar {
        expected: expected.into(),
        found: field.text.to_string(),
        line,
        column: field.column,
    }
}

pub(crate) fn parse_number<T: FromStr>(field: Field, expected: &'static str, line: usize) -> Result<T> {
    field.text.parse::<T>().map_err(|_| BvhError::Numeric {
        expected,
        found: field.text.to_string(),
        line,
        column: field.column,
    })
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Recursive-descent parser over the tokenized lines. Builds the joint arena top-down;
/// a joint's index is its declaration order, which is also the order its channels appear in each motion line.
struct Parser<'a> {
    tokens: TokenStream<'a>,
    options: ParseOptions,
    joints: Vec<Joint>,
    num_channels: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, options: ParseOptions) -> Self {
        Parser {
            tokens: TokenStream::new(text),
            options,
            joints: Vec::new(),
            num_channels: 0,
        }
    }

    fn is_keyword(&self, field: Field, keyword: &str) -> bool {
        self.options.keyword_matches(field.text, keyword)
    }

    fn next_line(&mut self, expected: &str) -> Result<Line<'a>> {
        self.tokens.next_line().ok_or_else(|| BvhError::UnexpectedEof {
            expected: expected.to_string(),
        })
    }

    /// Consume a line consisting of exactly `keywords` (e.g. `MOTION`, `{`).
    fn expect_record(&mut self, keywords: &[&str]) -> Result<Line<'a>> {
        let expected = keywords.join(" ");
        let line = self.next_line(&expected)?;
        for (i, keyword) in keywords.iter().enumerate() {
            match line.fields.get(i) {
                Some(&field) if self.is_keyword(field, keyword) => {}
                Some(&field) => return Err(grammar_error_at(expected, field, line.number)),
                None => return Err(grammar_error(expected, &line)),
            }
        }
        if line.len() != keywords.len() {
            return Err(grammar_error_at(
                format!("end of line after '{}'", expected),
                line.fields[keywords.len()],
                line.number,
            ));
        }
        Ok(line)
    }

    ////////////////////////////////////////////// HIERARCHY //////////////////////////////////////////////

    fn parse_hierarchy(&mut self) -> Result<()> {
        self.expect_record(&["HIERARCHY"])?;

        let header = self.next_line("ROOT")?;
        if !self.is_keyword(header.first(), "ROOT") {
            return Err(grammar_error_at("ROOT", header.first(), header.number));
        }
        self.parse_joint(header, JointKind::Root, None, 0)?;

        tracing::debug!(
            joints = self.joints.len(),
            channels = self.num_channels,
            "parsed bvh hierarchy"
        );
        Ok(())
    }

    /// Add a joint to the arena and to its parent's children.
    fn push_joint(&mut self, name: String, kind: JointKind, parent: Option<Index>, depth: Depth) -> Index {
        let index = self.joints.len();
        if let Some(parent) = parent {
            self.joints[parent].children.push(index);
        }
        self.joints.push(Joint::new(name, index, kind, parent, depth));
        index
    }

    /// `ROOT|JOINT name { OFFSET x y z CHANNELS n ... (JOINT ...|End Site ...)* }`, header line already consumed.
    fn parse_joint(
        &mut self,
        header: Line<'a>,
        kind: JointKind,
        parent: Option<Index>,
        depth: Depth,
    ) -> Result<Index> {
        if header.len() < 2 {
            return Err(grammar_error("joint name", &header));
        }
        // names with spaces are kept whole
        let name = header.fields[1..]
            .iter()
            .map(|field| field.text)
            .collect::<Vec<_>>()
            .join(" ");
        tracing::trace!(name = %name, depth, "joint");

        let index = self.push_joint(name, kind, parent, depth);

        self.expect_record(&["{"])?;
        self.joints[index].offset = self.parse_offset()?;
        self.parse_channels(index)?;

        //// children until the closing brace
        loop {
            let line = self.next_line("JOINT, End Site or '}'")?;
            let first = line.first();
            if first.text == "}" && line.len() == 1 {
                break;
            }
            if depth >= self.options.max_joint_depth {
                return Err(grammar_error(
                    format!("at most {} levels of joint nesting", self.options.max_joint_depth),
                    &line,
                ));
            }
            if self.is_keyword(first, "JOINT") {
                self.parse_joint(line, JointKind::Joint, Some(index), depth + 1)?;
            } else if self.is_keyword(first, "End") {
                match line.fields.get(1) {
                    Some(&site) if self.is_keyword(site, "Site") && line.len() == 2 => {
                        self.parse_end_site(index, depth + 1)?;
                    }
                    _ => return Err(grammar_error("End Site", &line)),
                }
            } else {
                return Err(grammar_error_at("JOINT, End Site or '}'", first, line.number));
            }
        }

        Ok(index)
    }

    /// `End Site { OFFSET x y z }`, header line already consumed.
    fn parse_end_site(&mut self, parent: Index, depth: Depth) -> Result<Index> {
        let index = self.push_joint(END_SITE_NAME.to_string(), JointKind::EndSite, Some(parent), depth);
        self.expect_record(&["{"])?;
        self.joints[index].offset = self.parse_offset()?;
        self.expect_record(&["}"])?;
        Ok(index)
    }

    fn parse_offset(&mut self) -> Result<Position> {
        let line = self.next_line("OFFSET")?;
        if !self.is_keyword(line.first(), "OFFSET") {
            return Err(grammar_error_at("OFFSET", line.first(), line.number));
        }
        if line.len() != 4 {
            return Err(grammar_error("OFFSET followed by 3 numbers", &line));
        }
        let x = parse_number(line.fields[1], "offset x", line.number)?;
        let y = parse_number(line.fields[2], "offset y", line.number)?;
        let z = parse_number(line.fields[3], "offset z", line.number)?;
        Ok(Position::new(x, y, z))
    }

    /// `CHANNELS n name*n`. Fills the joint's channel list, slot table and rotation order.
    fn parse_channels(&mut self, index: Index) -> Result<()> {
        let line = self.next_line("CHANNELS")?;
        if !self.is_keyword(line.first(), "CHANNELS") {
            return Err(grammar_error_at("CHANNELS", line.first(), line.number));
        }
        let count_field = *line
            .fields
            .get(1)
            .ok_or_else(|| grammar_error("CHANNELS followed by a channel count", &line))?;
        let declared: usize = parse_number(count_field, "channel count", line.number)?;
        let listed = line.len() - 2;
        if declared != listed || declared > CHANNEL_SLOTS {
            return Err(BvhError::ChannelCount {
                joint: self.joints[index].name.clone(),
                declared,
                found: listed,
                line: line.number,
            });
        }

        let mut channels = Vec::with_capacity(declared);
        let mut slots: ChannelSlots = [None; CHANNEL_SLOTS];
        let mut rotation_axes = Vec::new();
        for &field in &line.fields[2..] {
            let channel = Channel::from_name(field.text, self.options.case_sensitive_keywords)
                .ok_or_else(|| BvhError::UnknownChannel {
                    name: field.text.to_string(),
                    line: line.number,
                    column: field.column,
                })?;
            if slots[channel.slot()].is_some() {
                return Err(BvhError::DuplicateChannel {
                    joint: self.joints[index].name.clone(),
                    channel: channel.name(),
                    line: line.number,
                });
            }
            //// global column of this channel in every motion line
            slots[channel.slot()] = Some(self.num_channels);
            self.num_channels += 1;
            if channel.is_rotation() {
                rotation_axes.push(channel.axis());
            }
            channels.push(channel);
        }

        let joint = &mut self.joints[index];
        joint.channels = channels;
        joint.channel_slots = slots;
        joint.rotation_order = RotationOrder::from_listed(&rotation_axes);
        Ok(())
    }

    ////////////////////////////////////////////// MOTION //////////////////////////////////////////////

    /// `MOTION Frames: n Frame Time: t`, returns (num_frames, frame_time).
    fn parse_motion_header(&mut self) -> Result<(usize, f64)> {
        self.expect_record(&["MOTION"])?;

        let line = self.next_line("Frames:")?;
        if !self.is_keyword(line.first(), "Frames:") {
            return Err(grammar_error_at("Frames:", line.first(), line.number));
        }
        if line.len() != 2 {
            return Err(grammar_error("Frames: followed by a frame count", &line));
        }
        let num_frames = parse_number(line.fields[1], "frame count", line.number)?;

        let line = self.next_line("Frame Time:")?;
        let is_frame_time = line.len() >= 2
            && self.is_keyword(line.fields[0], "Frame")
            && self.is_keyword(line.fields[1], "Time:");
        if !is_frame_time {
            return Err(grammar_error_at("Frame Time:", line.first(), line.number));
        }
        if line.len() != 3 {
            return Err(grammar_error("Frame Time: followed by a number", &line));
        }
        let frame_time = parse_number(line.fields[2], "frame time", line.number)?;

        Ok((num_frames, frame_time))
    }

    fn parse(mut self) -> Result<Bvh> {
        self.parse_hierarchy()?;
        let (num_frames, frame_time) = self.parse_motion_header()?;

        motion::decode_motion(
            &mut self.tokens,
            &mut self.joints,
            num_frames,
            self.num_channels,
            &self.options,
        )?;

        tracing::debug!(num_frames, frame_time, "decoded bvh motion");

        Ok(Bvh {
            joints: self.joints,
            num_frames,
            frame_time,
            num_channels: self.num_channels,
        })
    }
}

//////////////////////////////////////////////////////////////// PUBLIC ///////////////////////////////////////////////////////////////

/// load a bvh file from a file path
pub fn load_bvh_from_file<P: AsRef<Path>>(path: P) -> Result<Bvh> {
    load_bvh_from_file_with_options(path, &ParseOptions::default())
}

/// load a bvh file from a file path with custom parsing options
pub fn load_bvh_from_file_with_options<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Bvh> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("load_bvh", path = %path.display()).entered();

    let contents = std::fs::read_to_string(path).map_err(|source| BvhError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_bvh_from_string_with_options(&contents, options)
}

/// load a bvh file from a string
pub fn load_bvh_from_string(bvh_string: &str) -> Result<Bvh> {
    load_bvh_from_string_with_options(bvh_string, &ParseOptions::default())
}

/// load a bvh file from a string with custom parsing options
pub fn load_bvh_from_string_with_options(bvh_string: &str, options: &ParseOptions) -> Result<Bvh> {
    Parser::new(bvh_string, *options).parse()
}
